/// Output manifest linking converted clouds, their files and rejected pictures.
use crate::bounds::Bounds;
use crate::error::PictureCloudError;
use crate::export::CloudFiles;
use crate::pipeline::SampleReport;
use crate::scale::ScaleFactor;
use crate::surface::SurfaceExtent;
use constants::texture::MANIFEST_FILE_NAME;
use log::info;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Unified manifest for one conversion run.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CloudManifest {
    pub clouds: Vec<CloudInfo>,
    pub rejected: Vec<RejectedPicture>,
}

/// One converted picture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudInfo {
    pub name: String,
    pub image_size: [u32; 2],
    pub surface: SurfaceExtent,
    pub scale_factor: ScaleFactor,
    pub tolerance: f64,
    pub point_count: usize,
    /// Shared by every point; LAS output has no per-point normal.
    pub normal: Vector3<f64>,
    pub bounds: Bounds,
    pub files: CloudFiles,
}

impl CloudInfo {
    pub fn new(report: SampleReport, files: CloudFiles) -> Self {
        Self {
            name: report.name,
            image_size: [report.image_width, report.image_height],
            surface: report.surface,
            scale_factor: report.scale_factor,
            tolerance: report.tolerance,
            point_count: report.point_count,
            normal: report.normal,
            bounds: report.bounds,
            files,
        }
    }
}

/// A picture that produced no cloud, with the reason shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedPicture {
    pub name: String,
    pub reason: String,
}

/// Writes the manifest into the output directory.
pub struct ManifestGenerator {
    output_dir: PathBuf,
}

impl ManifestGenerator {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(MANIFEST_FILE_NAME)
    }

    pub fn write(&self, manifest: &CloudManifest) -> Result<PathBuf, PictureCloudError> {
        let manifest_path = self.manifest_path();
        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(&manifest_path, manifest_json)?;

        info!("Generated manifest: {}", manifest_path.display());
        self.log_summary(manifest);

        Ok(manifest_path)
    }

    pub fn read(path: &Path) -> Result<CloudManifest, PictureCloudError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn log_summary(&self, manifest: &CloudManifest) {
        let total_points: usize = manifest.clouds.iter().map(|c| c.point_count).sum();
        info!("Manifest Summary:");
        info!("  Clouds: {}", manifest.clouds.len());
        info!("  Points: {}", total_points);

        for cloud in &manifest.clouds {
            info!(
                "  {}: {}x{} pixels, {:.6} units/pixel",
                cloud.name,
                cloud.image_size[0],
                cloud.image_size[1],
                cloud.scale_factor.value()
            );
        }

        if !manifest.rejected.is_empty() {
            info!("  Rejected: {}", manifest.rejected.len());
        }
    }
}
