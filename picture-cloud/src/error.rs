/// Error taxonomy for picture sampling and export.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PictureCloudError {
    #[error("surface is degenerate: width {width}, height {height}")]
    DegenerateSurface { width: f64, height: f64 },

    #[error("image is degenerate: {width}x{height} pixels")]
    DegenerateImage { width: u32, height: u32 },

    #[error(
        "picture is scaled non-uniformly: predicted height {predicted:.6}, actual height {actual:.6}, \
         off by {discrepancy:.6} (tolerance {tolerance})"
    )]
    NonUniformScale {
        predicted: f64,
        actual: f64,
        discrepancy: f64,
        tolerance: f64,
    },

    #[error("failed to read image: {0}")]
    ImageRead(String),

    #[error("image of {width}x{height} pixels does not fit in memory")]
    ImageTooLarge { width: u32, height: u32 },

    #[error("invalid placement plane: {0}")]
    InvalidPlane(String),

    #[error("tolerance must be a non-negative number, got {0}")]
    InvalidTolerance(f64),

    #[error("sampling cancelled at row {row}")]
    Cancelled { row: u32 },

    #[error("invalid surface descriptor {path}: {reason}")]
    Descriptor { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("LAS error: {0}")]
    Las(#[from] las::Error),

    #[error("DDS error: {0}")]
    Dds(#[from] ddsfile::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PictureCloudError {
    /// True for conditions caused by the picture itself rather than the environment.
    /// These are reported to the user and never retried.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            PictureCloudError::DegenerateSurface { .. }
                | PictureCloudError::DegenerateImage { .. }
                | PictureCloudError::NonUniformScale { .. }
                | PictureCloudError::ImageRead(_)
                | PictureCloudError::ImageTooLarge { .. }
                | PictureCloudError::InvalidPlane(_)
                | PictureCloudError::InvalidTolerance(_)
                | PictureCloudError::Descriptor { .. }
        )
    }
}

impl From<image::ImageError> for PictureCloudError {
    fn from(err: image::ImageError) -> Self {
        PictureCloudError::ImageRead(err.to_string())
    }
}
