use crate::bounds::Bounds;
use crate::error::PictureCloudError;
use crate::point_cloud::PointCloud;
use constants::texture::{LAS_FINEST_SCALE_EXPONENT, LAS_POINT_FORMAT};
use las::point::Format;
use las::{Builder, Color, Point, Transform, Vector, Writer};
use std::path::Path;

/// Write a cloud as LAS 1.2 point format 2 (XYZ + RGB).
/// Colours are widened from 8 to 16 bits; normals have no slot in the format.
pub fn write_las(
    path: &Path,
    cloud: &PointCloud,
    bounds: &Bounds,
    compressed: bool,
) -> Result<(), PictureCloudError> {
    let mut format = Format::new(LAS_POINT_FORMAT)?;
    format.is_compressed = compressed;

    let transforms = coordinate_transforms(bounds);
    // A point the writer cannot encode fails again when the writer drops, so reject
    // unrepresentable clouds before the file exists.
    check_representable(&transforms, bounds)?;

    let mut builder = Builder::from((1, 2));
    builder.point_format = format;
    builder.transforms = transforms;
    let header = builder.into_header()?;

    let mut writer = Writer::from_path(path, header)?;
    for sample in cloud.iter() {
        let [r, g, b] = sample.colour;
        writer.write_point(Point {
            x: sample.position.x,
            y: sample.position.y,
            z: sample.position.z,
            color: Some(Color::new(widen(r), widen(g), widen(b))),
            ..Default::default()
        })?;
    }
    writer.close()?;

    Ok(())
}

/// Offsets at the cloud minimum; each axis gets the finest power-of-ten scale its
/// extent allows.
fn coordinate_transforms(bounds: &Bounds) -> Vector<Transform> {
    Vector {
        x: axis_transform(bounds.min_x, bounds.max_x),
        y: axis_transform(bounds.min_y, bounds.max_y),
        z: axis_transform(bounds.min_z, bounds.max_z),
    }
}

fn axis_transform(min: f64, max: f64) -> Transform {
    if !(min.is_finite() && max.is_finite()) {
        return Transform {
            scale: 10f64.powi(LAS_FINEST_SCALE_EXPONENT),
            offset: 0.0,
        };
    }

    Transform {
        scale: axis_scale(max - min),
        offset: min,
    }
}

fn axis_scale(extent: f64) -> f64 {
    let limit = f64::from(i32::MAX);
    let mut exponent = LAS_FINEST_SCALE_EXPONENT;
    while extent / 10f64.powi(exponent) > limit && exponent < f64::MAX_10_EXP {
        exponent += 1;
    }
    10f64.powi(exponent)
}

fn check_representable(
    transforms: &Vector<Transform>,
    bounds: &Bounds,
) -> Result<(), PictureCloudError> {
    if bounds.is_empty() {
        return Ok(());
    }

    for (transform, min, max) in [
        (&transforms.x, bounds.min_x, bounds.max_x),
        (&transforms.y, bounds.min_y, bounds.max_y),
        (&transforms.z, bounds.min_z, bounds.max_z),
    ] {
        transform.inverse(min)?;
        transform.inverse(max)?;
    }
    Ok(())
}

fn widen(channel: u8) -> u16 {
    u16::from(channel) * 257
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};
    use tempfile::tempdir;

    #[test]
    fn round_trips_positions_and_colours() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cloud.las");

        let cloud = PointCloud::from_parts(
            vec![Point3::new(100.0, 200.0, 5.0), Point3::new(100.5, 201.25, 5.0)],
            vec![[255, 0, 128], [1, 2, 3]],
            vec![Vector3::z(); 2],
        );
        write_las(&path, &cloud, &cloud.bounds(), false).unwrap();

        let mut reader = las::Reader::from_path(&path).unwrap();
        assert_eq!(reader.header().number_of_points(), 2);

        let points: Vec<Point> = reader.points().map(|p| p.unwrap()).collect();
        assert!((points[1].x - 100.5).abs() < 1e-6);
        assert!((points[1].y - 201.25).abs() < 1e-6);
        assert_eq!(points[0].color, Some(Color::new(65535, 0, 128 * 257)));
    }

    #[test]
    fn scale_coarsens_only_for_wide_extents() {
        assert!((axis_scale(0.0) - 1e-4).abs() < 1e-15);
        assert!((axis_scale(200_000.0) - 1e-4).abs() < 1e-15);
        assert!((axis_scale(300_000.0) - 1e-3).abs() < 1e-12);
        assert!((axis_scale(5.0e9) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn wide_surface_is_written_with_a_coarser_scale() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cloud.las");

        // 300 km by 100 km at 1000 units per pixel.
        let cloud = PointCloud::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(299_000.0, 0.0, 0.0),
                Point3::new(299_000.0, 99_000.0, 0.0),
            ],
            vec![[10, 20, 30]; 3],
            vec![Vector3::z(); 3],
        );
        write_las(&path, &cloud, &cloud.bounds(), false).unwrap();

        let mut reader = las::Reader::from_path(&path).unwrap();
        let x_scale = reader.header().transforms().x.scale;
        assert!((x_scale - 1e-3).abs() < 1e-12);
        assert!((reader.header().transforms().y.scale - 1e-4).abs() < 1e-15);

        let points: Vec<Point> = reader.points().map(|p| p.unwrap()).collect();
        assert_eq!(points.len(), 3);
        assert!((points[2].x - 299_000.0).abs() < 1e-3);
        assert!((points[2].y - 99_000.0).abs() < 1e-4);
    }

    #[test]
    fn unrepresentable_cloud_is_an_error_before_writing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cloud.las");

        let cloud = PointCloud::from_parts(
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
            vec![[0, 0, 0]; 2],
            vec![Vector3::z(); 2],
        );
        let mut bounds = cloud.bounds();
        // An unbounded axis has no scale that fits the i32 record range.
        bounds.max_x = f64::INFINITY;

        let transforms = coordinate_transforms(&bounds);
        assert!(matches!(
            check_representable(&transforms, &bounds),
            Err(PictureCloudError::Las(_))
        ));
        assert!(matches!(
            write_las(&path, &cloud, &bounds, false),
            Err(PictureCloudError::Las(_))
        ));
        assert!(!path.exists());
    }
}
