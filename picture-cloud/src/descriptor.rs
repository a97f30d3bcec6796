/// JSON surface descriptors standing in for the host's picking and material lookup
use crate::error::PictureCloudError;
use crate::pipeline::{ResolvedPicture, SurfaceImageResolver};
use crate::plane::Plane;
use crate::source_image::SourceImage;
use crate::surface::SurfaceExtent;
use constants::coordinate_system::{WORLD_ORIGIN, WORLD_X_AXIS, WORLD_Y_AXIS};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Placement plane as written in a descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaneDescriptor {
    #[serde(default = "default_origin")]
    pub origin: [f64; 3],
    #[serde(default = "default_x_axis")]
    pub x_axis: [f64; 3],
    #[serde(default = "default_y_axis")]
    pub y_axis: [f64; 3],
}

impl Default for PlaneDescriptor {
    fn default() -> Self {
        Self {
            origin: WORLD_ORIGIN,
            x_axis: WORLD_X_AXIS,
            y_axis: WORLD_Y_AXIS,
        }
    }
}

fn default_origin() -> [f64; 3] {
    WORLD_ORIGIN
}

fn default_x_axis() -> [f64; 3] {
    WORLD_X_AXIS
}

fn default_y_axis() -> [f64; 3] {
    WORLD_Y_AXIS
}

/// Surface rectangle given directly, or as the outline it is boxed from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SurfaceGeometry {
    Extent {
        min_corner: [f64; 3],
        width: f64,
        height: f64,
    },
    Outline {
        outline: Vec<[f64; 3]>,
    },
}

/// One picture object: where it sits and which image it shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceDescriptor {
    /// Defaults to the descriptor's file stem.
    #[serde(default)]
    pub name: Option<String>,
    /// Image path, relative to the descriptor's directory unless absolute.
    pub image: PathBuf,
    #[serde(default)]
    pub plane: PlaneDescriptor,
    #[serde(flatten)]
    pub geometry: SurfaceGeometry,
    /// Document tolerance for this picture.
    #[serde(default)]
    pub tolerance: Option<f64>,
}

impl SurfaceDescriptor {
    pub fn load(path: &Path) -> Result<Self, PictureCloudError> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|err| PictureCloudError::Descriptor {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }

    pub fn plane(&self) -> Result<Plane, PictureCloudError> {
        Plane::new(
            Point3::from(self.plane.origin),
            Vector3::from(self.plane.x_axis),
            Vector3::from(self.plane.y_axis),
        )
    }

    pub fn surface(&self) -> Result<SurfaceExtent, PictureCloudError> {
        let plane = self.plane()?;
        match &self.geometry {
            SurfaceGeometry::Extent {
                min_corner,
                width,
                height,
            } => Ok(SurfaceExtent::new(
                Point3::from(*min_corner),
                plane,
                *width,
                *height,
            )),
            SurfaceGeometry::Outline { outline } => {
                let points: Vec<Point3<f64>> = outline.iter().copied().map(Point3::from).collect();
                SurfaceExtent::from_outline(&points, &plane)
            }
        }
    }
}

/// Resolves a descriptor file into surface geometry and a decoded image.
pub struct DescriptorResolver {
    path: PathBuf,
    descriptor: SurfaceDescriptor,
}

impl DescriptorResolver {
    pub fn from_path(path: &Path) -> Result<Self, PictureCloudError> {
        Ok(Self {
            path: path.to_path_buf(),
            descriptor: SurfaceDescriptor::load(path)?,
        })
    }

    pub fn descriptor(&self) -> &SurfaceDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> String {
        self.descriptor.name.clone().unwrap_or_else(|| {
            self.path
                .file_stem()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string()
        })
    }

    pub fn image_path(&self) -> PathBuf {
        let base = self.path.parent().unwrap_or(Path::new("."));
        base.join(&self.descriptor.image)
    }
}

impl SurfaceImageResolver for DescriptorResolver {
    type Image = SourceImage;

    fn resolve(&self) -> Result<ResolvedPicture<SourceImage>, PictureCloudError> {
        let surface = self.descriptor.surface()?;
        let image = SourceImage::open(&self.image_path())?;

        Ok(ResolvedPicture {
            name: self.name(),
            surface,
            image,
            tolerance: self.descriptor.tolerance,
        })
    }
}
