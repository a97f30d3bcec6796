/// Placement plane: origin plus an orthonormal in-plane frame
use crate::error::PictureCloudError;
use constants::coordinate_system::{
    PLANE_ORTHOGONALITY_EPSILON, WORLD_ORIGIN, WORLD_X_AXIS, WORLD_Y_AXIS,
};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3<f64>,
    pub x_axis: Vector3<f64>,
    pub y_axis: Vector3<f64>,
    pub normal: Vector3<f64>,
}

impl Plane {
    /// Build a plane from an origin and two in-plane axes.
    /// Axes are normalised; the normal is `x_axis × y_axis`.
    pub fn new(
        origin: Point3<f64>,
        x_axis: Vector3<f64>,
        y_axis: Vector3<f64>,
    ) -> Result<Self, PictureCloudError> {
        let x_axis = x_axis
            .try_normalize(f64::EPSILON)
            .ok_or_else(|| PictureCloudError::InvalidPlane("x axis has zero length".into()))?;
        let y_axis = y_axis
            .try_normalize(f64::EPSILON)
            .ok_or_else(|| PictureCloudError::InvalidPlane("y axis has zero length".into()))?;

        let skew = x_axis.dot(&y_axis);
        if !(skew.abs() <= PLANE_ORTHOGONALITY_EPSILON) {
            return Err(PictureCloudError::InvalidPlane(format!(
                "axes are not orthogonal (x·y = {skew:e})"
            )));
        }

        Ok(Self {
            origin,
            x_axis,
            y_axis,
            normal: x_axis.cross(&y_axis),
        })
    }

    pub fn world_xy() -> Self {
        let origin = Point3::from(WORLD_ORIGIN);
        let x_axis = Vector3::from(WORLD_X_AXIS);
        let y_axis = Vector3::from(WORLD_Y_AXIS);
        Self {
            origin,
            x_axis,
            y_axis,
            normal: x_axis.cross(&y_axis),
        }
    }

    /// Same frame, moved to a new origin
    pub fn with_origin(&self, origin: Point3<f64>) -> Self {
        Self { origin, ..*self }
    }

    /// World point at plane coordinates (u, v)
    pub fn point_at(&self, u: f64, v: f64) -> Point3<f64> {
        self.origin + self.x_axis * u + self.y_axis * v
    }

    /// Coordinates of `point` along x, y and normal, relative to the origin
    pub fn to_local(&self, point: &Point3<f64>) -> Vector3<f64> {
        let offset = point - self.origin;
        Vector3::new(
            offset.dot(&self.x_axis),
            offset.dot(&self.y_axis),
            offset.dot(&self.normal),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_follows_right_hand_rule() {
        let plane = Plane::new(
            Point3::origin(),
            Vector3::new(0.0, 2.0, 0.0),
            Vector3::new(0.0, 0.0, 5.0),
        )
        .unwrap();

        assert_eq!(plane.x_axis, Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(plane.y_axis, Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(plane.normal, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn rejects_skewed_and_zero_axes() {
        let skewed = Plane::new(
            Point3::origin(),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
        );
        assert!(matches!(skewed, Err(PictureCloudError::InvalidPlane(_))));

        let zero = Plane::new(Point3::origin(), Vector3::zeros(), Vector3::y());
        assert!(matches!(zero, Err(PictureCloudError::InvalidPlane(_))));
    }

    #[test]
    fn local_coordinates_invert_point_at() {
        let plane = Plane::world_xy().with_origin(Point3::new(10.0, -4.0, 2.0));
        let point = plane.point_at(3.5, 7.25);

        assert_eq!(point, Point3::new(13.5, 3.25, 2.0));
        assert_eq!(plane.to_local(&point), Vector3::new(3.5, 7.25, 0.0));
    }
}
