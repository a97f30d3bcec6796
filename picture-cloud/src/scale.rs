/// Uniform scale validation between a surface and its picture
use crate::error::PictureCloudError;
use serde::{Deserialize, Serialize};

/// Physical length covered by one source pixel, identical on both image axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Derive the scale factor from the width ratio and confirm it reproduces the height.
///
/// The surface is checked first, then the image, so no division happens on a zero-width
/// picture. The height check is strict: a discrepancy equal to the tolerance is rejected.
pub fn validate_scale(
    width: f64,
    height: f64,
    image_width: u32,
    image_height: u32,
    tolerance: f64,
) -> Result<ScaleFactor, PictureCloudError> {
    if !(width > 0.0 && height > 0.0) {
        return Err(PictureCloudError::DegenerateSurface { width, height });
    }

    if image_width == 0 || image_height == 0 {
        return Err(PictureCloudError::DegenerateImage {
            width: image_width,
            height: image_height,
        });
    }

    if !(tolerance >= 0.0) {
        return Err(PictureCloudError::InvalidTolerance(tolerance));
    }

    let scale = width / f64::from(image_width);
    let predicted = f64::from(image_height) * scale;
    let discrepancy = (predicted - height).abs();

    if !(discrepancy < tolerance) {
        return Err(PictureCloudError::NonUniformScale {
            predicted,
            actual: height,
            discrepancy,
            tolerance,
        });
    }

    Ok(ScaleFactor(scale))
}
