/// Axis-aligned coordinate bounds tracking and normalisation
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

impl Bounds {
    /// Create new bounds initialised to infinity values
    pub fn new() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
            min_z: f64::INFINITY,
            max_z: f64::NEG_INFINITY,
        }
    }

    /// Tight bounds around a set of points
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Self {
        let mut bounds = Self::new();
        for point in points {
            bounds.update(point.x, point.y, point.z);
        }
        bounds
    }

    /// Update bounds with a new point
    pub fn update(&mut self, x: f64, y: f64, z: f64) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
        self.min_z = self.min_z.min(z);
        self.max_z = self.max_z.max(z);
    }

    /// Grow to also cover `other`
    pub fn merge(mut self, other: &Bounds) -> Self {
        self.min_x = self.min_x.min(other.min_x);
        self.max_x = self.max_x.max(other.max_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_y = self.max_y.max(other.max_y);
        self.min_z = self.min_z.min(other.min_z);
        self.max_z = self.max_z.max(other.max_z);
        self
    }

    /// No point has been added yet
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x
    }

    /// World space dimensions
    pub fn dimensions(&self) -> (f64, f64, f64) {
        (
            self.max_x - self.min_x,
            self.max_y - self.min_y,
            self.max_z - self.min_z,
        )
    }

    pub fn min_point(&self) -> Point3<f64> {
        Point3::new(self.min_x, self.min_y, self.min_z)
    }

    pub fn max_point(&self) -> Point3<f64> {
        Point3::new(self.max_x, self.max_y, self.max_z)
    }

    /// Normalise a point into the 0-1 range per axis.
    /// Flat axes (zero extent) map to 0.
    pub fn normalise(&self, point: &Point3<f64>) -> Vector3<f32> {
        Vector3::new(
            normalise_axis(point.x, self.min_x, self.max_x),
            normalise_axis(point.y, self.min_y, self.max_y),
            normalise_axis(point.z, self.min_z, self.max_z),
        )
    }
}

fn normalise_axis(value: f64, min: f64, max: f64) -> f32 {
    let extent = max - min;
    if extent > 0.0 {
        ((value - min) / extent) as f32
    } else {
        0.0
    }
}
