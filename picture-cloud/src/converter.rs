/// Picture to point cloud converter orchestrating single and batch runs.
use crate::descriptor::DescriptorResolver;
use crate::error::PictureCloudError;
use crate::export::{ExportFormats, FileExportSink};
use crate::manifest::{CloudInfo, CloudManifest, ManifestGenerator, RejectedPicture};
use crate::pipeline::{PictureSampler, SampleOptions, SurfaceImageResolver};
use crate::scale::{ScaleFactor, validate_scale};
use crate::source_image::PixelSource;
use constants::sampling::{DEFAULT_ABSOLUTE_TOLERANCE, PROGRESS_CHARS};
use constants::texture::MANIFEST_FILE_NAME;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of a batch run.
#[derive(Debug)]
pub struct BatchSummary {
    pub converted: usize,
    pub rejected: usize,
    pub manifest_path: PathBuf,
}

/// Converts picture descriptors into point cloud files plus a manifest.
pub struct PictureCloudConverter {
    /// Root directory for per-picture outputs and the manifest.
    output_dir: PathBuf,
    formats: ExportFormats,
    /// Tolerance for descriptors that do not carry their own.
    default_tolerance: f64,
    options: SampleOptions,
}

impl PictureCloudConverter {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            formats: ExportFormats::default(),
            default_tolerance: DEFAULT_ABSOLUTE_TOLERANCE,
            options: SampleOptions::default(),
        }
    }

    pub fn with_formats(mut self, formats: ExportFormats) -> Self {
        self.formats = formats;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.default_tolerance = tolerance;
        self
    }

    pub fn with_options(mut self, options: SampleOptions) -> Self {
        self.options = options;
        self
    }

    /// Convert a single descriptor. A rejection fails the run and writes nothing.
    pub fn convert(&self, descriptor: &Path) -> Result<CloudInfo, PictureCloudError> {
        info!("Converting {}", descriptor.display());
        fs::create_dir_all(&self.output_dir)?;

        let mut sink = FileExportSink::new(&self.output_dir, self.formats);
        let cloud = self.convert_one(descriptor, &mut sink)?;

        let manifest = CloudManifest {
            clouds: vec![cloud.clone()],
            rejected: Vec::new(),
        };
        ManifestGenerator::new(&self.output_dir).write(&manifest)?;

        info!("Conversion complete!");
        Ok(cloud)
    }

    /// Convert every descriptor in a directory.
    /// Rejected pictures are recorded and skipped; the batch fails only if nothing converted.
    pub fn convert_batch(&self, descriptor_dir: &Path) -> Result<BatchSummary, PictureCloudError> {
        let descriptors = discover_descriptors(descriptor_dir)?;
        info!(
            "Found {} picture descriptors in {}",
            descriptors.len(),
            descriptor_dir.display()
        );

        if descriptors.is_empty() {
            return Err(PictureCloudError::Descriptor {
                path: descriptor_dir.to_path_buf(),
                reason: "no .json descriptors found".to_string(),
            });
        }

        fs::create_dir_all(&self.output_dir)?;
        let mut sink = FileExportSink::new(&self.output_dir, self.formats);
        let mut manifest = CloudManifest::default();

        let pb = ProgressBar::new(descriptors.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.green/blue}] {pos}/{len} pictures ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars(PROGRESS_CHARS),
        );
        if !self.options.show_progress {
            pb.set_draw_target(indicatif::ProgressDrawTarget::hidden());
        }
        pb.set_message("Converting pictures");

        let mut first_failure = None;
        for descriptor in &descriptors {
            match self.convert_one(descriptor, &mut sink) {
                Ok(cloud) => manifest.clouds.push(cloud),
                Err(err) if err.is_rejection() => {
                    let name = descriptor_name(descriptor);
                    warn!("Skipping '{}': {}", name, err);
                    manifest.rejected.push(RejectedPicture {
                        name,
                        reason: err.to_string(),
                    });
                    first_failure.get_or_insert(err);
                }
                Err(err) => {
                    pb.abandon_with_message("Batch aborted");
                    return Err(err);
                }
            }
            pb.inc(1);
        }
        pb.finish_with_message("Pictures converted");

        if manifest.clouds.is_empty() {
            if let Some(err) = first_failure {
                return Err(err);
            }
        }

        let manifest_path = ManifestGenerator::new(&self.output_dir).write(&manifest)?;
        Ok(BatchSummary {
            converted: manifest.clouds.len(),
            rejected: manifest.rejected.len(),
            manifest_path,
        })
    }

    /// Resolve and validate a descriptor without sampling or writing anything.
    pub fn check(&self, descriptor: &Path) -> Result<ScaleFactor, PictureCloudError> {
        let resolver = DescriptorResolver::from_path(descriptor)?;
        let picture = resolver.resolve()?;
        let (image_width, image_height) = picture.image.dimensions();
        let tolerance = picture.tolerance.unwrap_or(self.default_tolerance);

        validate_scale(
            picture.surface.width,
            picture.surface.height,
            image_width,
            image_height,
            tolerance,
        )
    }

    fn convert_one(
        &self,
        descriptor: &Path,
        sink: &mut FileExportSink,
    ) -> Result<CloudInfo, PictureCloudError> {
        let resolver = DescriptorResolver::from_path(descriptor)?;
        let report = PictureSampler::new(self.options.clone()).run(
            &resolver,
            &self.default_tolerance,
            sink,
        )?;

        let files = sink
            .last_exported()
            .map(|exported| exported.files.clone())
            .unwrap_or_default();

        Ok(CloudInfo::new(report, files))
    }
}

/// Lists `.json` descriptors in a directory, sorted by file name.
/// A manifest left behind by an earlier run is not a descriptor.
pub fn discover_descriptors(dir: &Path) -> Result<Vec<PathBuf>, PictureCloudError> {
    let mut descriptors = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("json"));

        let is_manifest = path
            .file_name()
            .is_some_and(|name| name == MANIFEST_FILE_NAME);

        if path.is_file() && is_json && !is_manifest {
            descriptors.push(path);
        }
    }

    descriptors.sort();
    Ok(descriptors)
}

fn descriptor_name(path: &Path) -> String {
    DescriptorResolver::from_path(path)
        .map(|resolver| resolver.name())
        .unwrap_or_else(|_| {
            path.file_stem()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string()
        })
}
