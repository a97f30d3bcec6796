//! Reconstructs coloured point clouds from pictures placed on planar surfaces.
//!
//! A picture is a rectangle on a placement plane plus the image mapped onto it. The
//! [`scale`] module checks that one physical-units-per-pixel factor fits both image axes,
//! then [`sampler`] emits one point per pixel with the pixel's colour and the plane normal.
//! Everything around that core (where pictures come from, where clouds go) is expressed as
//! the collaborator traits in [`pipeline`].

pub mod bounds;
pub mod converter;
pub mod dds_writer;
pub mod descriptor;
pub mod error;
pub mod export;
pub mod las_writer;
pub mod manifest;
pub mod pipeline;
pub mod plane;
pub mod point_cloud;
pub mod sampler;
pub mod scale;
pub mod source_image;
pub mod surface;

pub use converter::PictureCloudConverter;
pub use error::PictureCloudError;
pub use pipeline::{
    MemorySink, PictureSampler, PointCloudSink, ResolvedPicture, SampleOptions, SampleReport,
    SurfaceImageResolver, ToleranceProvider, sample_picture,
};
pub use plane::Plane;
pub use point_cloud::{PointCloud, Sample};
pub use sampler::{CancellationToken, GridSampler};
pub use scale::{ScaleFactor, validate_scale};
pub use source_image::{Colour, PixelSource, SourceImage};
pub use surface::SurfaceExtent;
