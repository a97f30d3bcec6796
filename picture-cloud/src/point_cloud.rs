/// Coloured point cloud with one sample per source pixel
use crate::bounds::Bounds;
use crate::source_image::Colour;
use constants::sampling::BOUNDS_CHUNK_SIZE;
use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

/// One point of the cloud
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub position: Point3<f64>,
    pub colour: Colour,
    pub normal: Vector3<f64>,
}

/// Parallel position, colour and normal sequences of equal length.
/// Clouds sampled from a picture keep its pixel grid: sample `row * width + col`.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    positions: Vec<Point3<f64>>,
    colours: Vec<Colour>,
    normals: Vec<Vector3<f64>>,
    grid: Option<(u32, u32)>,
}

impl PointCloud {
    pub(crate) fn from_parts(
        positions: Vec<Point3<f64>>,
        colours: Vec<Colour>,
        normals: Vec<Vector3<f64>>,
    ) -> Self {
        debug_assert_eq!(positions.len(), colours.len());
        debug_assert_eq!(positions.len(), normals.len());
        Self {
            positions,
            colours,
            normals,
            grid: None,
        }
    }

    /// Mark the cloud as laid out on a `width x height` pixel grid
    pub(crate) fn with_grid(mut self, width: u32, height: u32) -> Self {
        debug_assert_eq!(self.positions.len(), width as usize * height as usize);
        self.grid = Some((width, height));
        self
    }

    /// Pixel grid dimensions, when the cloud came from a picture
    pub fn grid(&self) -> Option<(u32, u32)> {
        self.grid
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn colours(&self) -> &[Colour] {
        &self.colours
    }

    pub fn normals(&self) -> &[Vector3<f64>] {
        &self.normals
    }

    pub fn sample(&self, index: usize) -> Option<Sample> {
        Some(Sample {
            position: *self.positions.get(index)?,
            colour: self.colours[index],
            normal: self.normals[index],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Sample> + '_ {
        self.positions
            .iter()
            .zip(&self.colours)
            .zip(&self.normals)
            .map(|((position, colour), normal)| Sample {
                position: *position,
                colour: *colour,
                normal: *normal,
            })
    }

    /// Coordinate bounds, reduced over parallel chunks
    pub fn bounds(&self) -> Bounds {
        self.positions
            .par_chunks(BOUNDS_CHUNK_SIZE)
            .map(|chunk| Bounds::from_points(chunk))
            .reduce(Bounds::new, |a, b| a.merge(&b))
    }

    pub fn into_parts(self) -> (Vec<Point3<f64>>, Vec<Colour>, Vec<Vector3<f64>>) {
        (self.positions, self.colours, self.normals)
    }
}
