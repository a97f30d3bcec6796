/// Per-pixel grid sampling of a picture onto its surface
use crate::error::PictureCloudError;
use crate::plane::Plane;
use crate::point_cloud::PointCloud;
use crate::scale::ScaleFactor;
use crate::source_image::{Colour, PixelSource};
use crate::surface::SurfaceExtent;
use constants::sampling::{PROGRESS_CHARS, PROGRESS_TEMPLATE};
use indicatif::{ProgressBar, ProgressStyle};
use nalgebra::Point3;
use rayon::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag for aborting a running conversion.
/// Checked once per image row.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Maps every pixel `(col, row)` to `origin + col·s·x + row·s·y` on the surface plane.
pub struct GridSampler {
    /// Surface plane with its origin on the minimum corner.
    plane: Plane,
    /// Physical units per pixel.
    scale: f64,
    cancellation: Option<CancellationToken>,
    show_progress: bool,
}

impl GridSampler {
    pub fn new(surface: &SurfaceExtent, scale: ScaleFactor) -> Self {
        Self {
            plane: surface.plane.with_origin(surface.min_corner),
            scale: scale.value(),
            cancellation: None,
            show_progress: false,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// World position of the sample for pixel `(col, row)`
    pub fn position_at(&self, col: u32, row: u32) -> Point3<f64> {
        self.plane
            .point_at(f64::from(col) * self.scale, f64::from(row) * self.scale)
    }

    /// Sample every pixel into a point cloud, rows in parallel.
    /// Sample `row * width + col` belongs to pixel `(col, row)`. Any failure discards the
    /// whole cloud.
    pub fn sample<S: PixelSource + ?Sized>(
        &self,
        image: &S,
    ) -> Result<PointCloud, PictureCloudError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(PictureCloudError::DegenerateImage { width, height });
        }

        let row_len = width as usize;
        let count = row_len
            .checked_mul(height as usize)
            .ok_or(PictureCloudError::ImageTooLarge { width, height })?;

        let mut positions = vec![Point3::origin(); count];
        let mut colours: Vec<Colour> = vec![[0; 3]; count];
        let normals = vec![self.plane.normal; count];

        let pb = self.progress_bar(height);

        let result = positions
            .par_chunks_mut(row_len)
            .zip(colours.par_chunks_mut(row_len))
            .enumerate()
            .try_for_each(|(row, (position_row, colour_row))| {
                let row = row as u32;
                if self.is_cancelled() {
                    return Err(PictureCloudError::Cancelled { row });
                }

                for (col, (position, colour)) in
                    position_row.iter_mut().zip(colour_row.iter_mut()).enumerate()
                {
                    let col = col as u32;
                    *position = self.position_at(col, row);
                    *colour = image.pixel(col, row)?;
                }

                pb.inc(1);
                Ok(())
            });

        if let Err(err) = result {
            pb.abandon_with_message("Sampling aborted");
            return Err(err);
        }
        pb.finish_with_message("Pixels sampled");

        Ok(PointCloud::from_parts(positions, colours, normals).with_grid(width, height))
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    fn progress_bar(&self, rows: u32) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(u64::from(rows));
        pb.set_style(
            ProgressStyle::default_bar()
                .template(PROGRESS_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars(PROGRESS_CHARS),
        );
        pb.set_message("Sampling pixels");
        pb
    }
}
