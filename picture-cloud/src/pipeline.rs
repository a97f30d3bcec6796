/// Validate-then-sample pipeline and the collaborators it talks to.
use crate::bounds::Bounds;
use crate::error::PictureCloudError;
use crate::point_cloud::PointCloud;
use crate::sampler::{CancellationToken, GridSampler};
use crate::scale::{ScaleFactor, validate_scale};
use crate::source_image::PixelSource;
use crate::surface::SurfaceExtent;
use log::{debug, info};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Surface geometry and decoded picture ready for sampling.
pub struct ResolvedPicture<I> {
    /// Display name used for output files and reports.
    pub name: String,
    pub surface: SurfaceExtent,
    pub image: I,
    /// Tolerance attached to this picture, overriding the provider's value.
    pub tolerance: Option<f64>,
}

/// Supplies the picture surface and its decoded image.
pub trait SurfaceImageResolver {
    type Image: PixelSource;

    fn resolve(&self) -> Result<ResolvedPicture<Self::Image>, PictureCloudError>;
}

/// Supplies the absolute length tolerance of the active document.
pub trait ToleranceProvider {
    fn absolute_tolerance(&self) -> f64;
}

impl ToleranceProvider for f64 {
    fn absolute_tolerance(&self) -> f64 {
        *self
    }
}

/// Receives finished point clouds. Ownership passes to the sink.
pub trait PointCloudSink {
    fn store(&mut self, name: &str, cloud: PointCloud) -> Result<(), PictureCloudError>;
}

/// Sink keeping clouds in memory, in storage order.
#[derive(Default)]
pub struct MemorySink {
    pub clouds: Vec<(String, PointCloud)>,
}

impl PointCloudSink for MemorySink {
    fn store(&mut self, name: &str, cloud: PointCloud) -> Result<(), PictureCloudError> {
        self.clouds.push((name.to_string(), cloud));
        Ok(())
    }
}

/// Runtime switches for a sampling run.
#[derive(Debug, Clone, Default)]
pub struct SampleOptions {
    pub cancellation: Option<CancellationToken>,
    pub show_progress: bool,
}

/// Summary of one successful conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleReport {
    pub name: String,
    pub image_width: u32,
    pub image_height: u32,
    pub surface: SurfaceExtent,
    pub scale_factor: ScaleFactor,
    pub tolerance: f64,
    pub point_count: usize,
    pub normal: Vector3<f64>,
    pub bounds: Bounds,
}

/// Validate the picture's scale against its surface, then sample every pixel.
pub fn sample_picture<S: PixelSource + ?Sized>(
    surface: &SurfaceExtent,
    image: &S,
    tolerance: f64,
    options: &SampleOptions,
) -> Result<(ScaleFactor, PointCloud), PictureCloudError> {
    let (image_width, image_height) = image.dimensions();
    let scale = validate_scale(
        surface.width,
        surface.height,
        image_width,
        image_height,
        tolerance,
    )?;
    debug!(
        "Scale factor {} units/pixel for {}x{} picture on {}x{} surface",
        scale.value(),
        image_width,
        image_height,
        surface.width,
        surface.height
    );

    let mut sampler = GridSampler::new(surface, scale).with_progress(options.show_progress);
    if let Some(token) = &options.cancellation {
        sampler = sampler.with_cancellation(token.clone());
    }

    let cloud = sampler.sample(image)?;
    Ok((scale, cloud))
}

/// Drives resolver → validator → sampler → sink for one picture.
pub struct PictureSampler {
    options: SampleOptions,
}

impl PictureSampler {
    pub fn new(options: SampleOptions) -> Self {
        Self { options }
    }

    /// Run one conversion. The sink is only called when a complete cloud exists.
    pub fn run<R, T, K>(
        &self,
        resolver: &R,
        tolerance: &T,
        sink: &mut K,
    ) -> Result<SampleReport, PictureCloudError>
    where
        R: SurfaceImageResolver + ?Sized,
        T: ToleranceProvider + ?Sized,
        K: PointCloudSink + ?Sized,
    {
        let picture = resolver.resolve()?;
        let tolerance = picture
            .tolerance
            .unwrap_or_else(|| tolerance.absolute_tolerance());

        info!("Sampling picture '{}'", picture.name);
        let (scale, cloud) =
            sample_picture(&picture.surface, &picture.image, tolerance, &self.options)?;

        let (image_width, image_height) = picture.image.dimensions();
        let report = SampleReport {
            name: picture.name.clone(),
            image_width,
            image_height,
            surface: picture.surface,
            scale_factor: scale,
            tolerance,
            point_count: cloud.len(),
            normal: picture.surface.plane.normal,
            bounds: cloud.bounds(),
        };

        sink.store(&picture.name, cloud)?;
        info!(
            "Stored {} points for '{}'",
            report.point_count, report.name
        );

        Ok(report)
    }
}
