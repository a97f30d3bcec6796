/// Rectangular picture surface placed in 3D space
use crate::bounds::Bounds;
use crate::error::PictureCloudError;
use crate::plane::Plane;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle on a placement plane.
/// Edges run along the plane's x and y axes; rotation within the plane is not modelled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceExtent {
    /// Corner with the smallest plane coordinates.
    pub min_corner: Point3<f64>,
    /// Placement plane with its origin moved onto `min_corner`.
    pub plane: Plane,
    /// Extent along the plane's x axis.
    pub width: f64,
    /// Extent along the plane's y axis.
    pub height: f64,
}

impl SurfaceExtent {
    pub fn new(min_corner: Point3<f64>, plane: Plane, width: f64, height: f64) -> Self {
        Self {
            min_corner,
            plane: plane.with_origin(min_corner),
            width,
            height,
        }
    }

    /// Derive the extent from the surface's bounding geometry.
    /// Points are boxed in the plane's local frame, so the box edges follow the plane axes.
    pub fn from_outline(outline: &[Point3<f64>], plane: &Plane) -> Result<Self, PictureCloudError> {
        let local: Vec<Point3<f64>> = outline
            .iter()
            .map(|point| Point3::from(plane.to_local(point)))
            .collect();
        let bounds = Bounds::from_points(&local);

        if bounds.is_empty() {
            return Err(PictureCloudError::DegenerateSurface {
                width: 0.0,
                height: 0.0,
            });
        }

        let (width, height, _) = bounds.dimensions();
        let min_corner = plane.point_at(bounds.min_x, bounds.min_y) + plane.normal * bounds.min_z;

        Ok(Self::new(min_corner, *plane, width, height))
    }

    /// Corner opposite `min_corner`
    pub fn max_corner(&self) -> Point3<f64> {
        self.plane.point_at(self.width, self.height)
    }
}
