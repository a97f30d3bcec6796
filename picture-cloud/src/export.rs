/// File-backed point cloud sink writing LAS/LAZ and DDS texture outputs
use crate::bounds::Bounds;
use crate::dds_writer::{write_f16_texture, write_f32_texture};
use crate::error::PictureCloudError;
use crate::las_writer::write_las;
use crate::pipeline::PointCloudSink;
use crate::point_cloud::PointCloud;
use constants::texture::{
    COLOUR_TEXTURE_NAME, LAS_FILE_NAME, LAZ_FILE_NAME, POSITION_TEXTURE_NAME,
};
use half::f16;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Output formats written for every stored cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFormats {
    pub las: bool,
    pub laz: bool,
    pub dds: bool,
}

impl ExportFormats {
    pub fn all() -> Self {
        Self {
            las: true,
            laz: true,
            dds: true,
        }
    }

    pub fn las_only() -> Self {
        Self {
            las: true,
            laz: false,
            dds: false,
        }
    }
}

impl Default for ExportFormats {
    fn default() -> Self {
        Self {
            las: true,
            laz: false,
            dds: true,
        }
    }
}

/// Files written for one cloud, relative to the output directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudFiles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub las: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub laz: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colour: Option<String>,
}

/// Record of one cloud written by the sink.
#[derive(Debug, Clone)]
pub struct ExportedCloud {
    pub name: String,
    pub directory: String,
    pub files: CloudFiles,
}

/// Writes each stored cloud into `<output>/<ProgrammaticName>/`.
pub struct FileExportSink {
    output_dir: PathBuf,
    formats: ExportFormats,
    exported: Vec<ExportedCloud>,
    /// Directory names handed out so far; later clouds with the same name get a suffix.
    used_directories: HashSet<String>,
}

impl FileExportSink {
    pub fn new(output_dir: &Path, formats: ExportFormats) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            formats,
            exported: Vec::new(),
            used_directories: HashSet::new(),
        }
    }

    pub fn exported(&self) -> &[ExportedCloud] {
        &self.exported
    }

    pub fn last_exported(&self) -> Option<&ExportedCloud> {
        self.exported.last()
    }

    /// Claim a unique directory name for a cloud.
    fn claim_directory(&mut self, name: &str) -> Result<String, PictureCloudError> {
        let base = generate_programmatic_name(name);
        if base.is_empty() {
            return Err(PictureCloudError::Descriptor {
                path: PathBuf::from(name),
                reason: "cloud name has no alphanumeric characters".to_string(),
            });
        }

        let mut directory = base.clone();
        let mut suffix = 2;
        while self.used_directories.contains(&directory) {
            directory = format!("{base}{suffix}");
            suffix += 1;
        }
        if directory != base {
            warn!("'{}' collides with an earlier cloud; writing to {}", name, directory);
        }

        self.used_directories.insert(directory.clone());
        Ok(directory)
    }

    fn write_cloud(
        &self,
        cloud_dir: &Path,
        directory: &str,
        cloud: &PointCloud,
    ) -> Result<CloudFiles, PictureCloudError> {
        let bounds = cloud.bounds();
        let mut files = CloudFiles::default();

        if self.formats.las {
            write_las(&cloud_dir.join(LAS_FILE_NAME), cloud, &bounds, false)?;
            files.las = Some(format!("{directory}/{LAS_FILE_NAME}"));
        }

        if self.formats.laz {
            write_las(&cloud_dir.join(LAZ_FILE_NAME), cloud, &bounds, true)?;
            files.laz = Some(format!("{directory}/{LAZ_FILE_NAME}"));
        }

        // Textures need the pixel grid; unorganised clouds only get LAS output.
        if let (true, Some(grid)) = (self.formats.dds, cloud.grid()) {
            self.write_textures(cloud_dir, cloud, &bounds, grid)?;
            files.position = Some(format!("{directory}/{POSITION_TEXTURE_NAME}"));
            files.colour = Some(format!("{directory}/{COLOUR_TEXTURE_NAME}"));
        }

        Ok(files)
    }

    fn write_textures(
        &self,
        cloud_dir: &Path,
        cloud: &PointCloud,
        bounds: &Bounds,
        (width, height): (u32, u32),
    ) -> Result<(), PictureCloudError> {
        let mut position_data = Vec::with_capacity(cloud.len() * 4);
        for position in cloud.positions() {
            let normalised = bounds.normalise(position);
            position_data.extend_from_slice(&[normalised.x, normalised.y, normalised.z, 1.0]);
        }

        let mut colour_data = Vec::with_capacity(cloud.len() * 4);
        for [r, g, b] in cloud.colours() {
            colour_data.extend_from_slice(&[
                f16::from_f32(f32::from(*r) / 255.0),
                f16::from_f32(f32::from(*g) / 255.0),
                f16::from_f32(f32::from(*b) / 255.0),
                f16::ONE,
            ]);
        }

        write_f32_texture(
            &cloud_dir.join(POSITION_TEXTURE_NAME),
            width,
            height,
            &position_data,
        )?;
        write_f16_texture(
            &cloud_dir.join(COLOUR_TEXTURE_NAME),
            width,
            height,
            &colour_data,
        )?;

        Ok(())
    }
}

impl PointCloudSink for FileExportSink {
    fn store(&mut self, name: &str, cloud: PointCloud) -> Result<(), PictureCloudError> {
        let directory = self.claim_directory(name)?;
        let cloud_dir = self.output_dir.join(&directory);
        fs::create_dir_all(&cloud_dir)?;

        let files = match self.write_cloud(&cloud_dir, &directory, &cloud) {
            Ok(files) => files,
            Err(err) => {
                // No partial output survives a failed write.
                if let Err(cleanup) = fs::remove_dir_all(&cloud_dir) {
                    warn!("Failed to remove {}: {}", cloud_dir.display(), cleanup);
                }
                return Err(err);
            }
        };

        info!("Exported '{}' to {}", name, cloud_dir.display());
        self.exported.push(ExportedCloud {
            name: name.to_string(),
            directory,
            files,
        });

        Ok(())
    }
}

/// Converts a free-form name to PascalCase.
/// Only alphanumeric characters survive; anything else separates words.
pub fn generate_programmatic_name(input: &str) -> String {
    input
        .split(|c: char| !c.is_alphanumeric())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<String>()
}
