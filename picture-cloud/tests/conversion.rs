use image::{Rgb, RgbImage};
use picture_cloud::PictureCloudError;
use picture_cloud::converter::PictureCloudConverter;
use picture_cloud::export::ExportFormats;
use picture_cloud::manifest::ManifestGenerator;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_picture(path: &Path, width: u32, height: u32) {
    RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 42]))
        .save(path)
        .unwrap();
}

fn write_descriptor(dir: &Path, file: &str, body: &str) -> PathBuf {
    let path = dir.join(file);
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn converts_a_picture_to_las_textures_and_manifest() {
    let temp_dir = tempdir().unwrap();
    let dir = temp_dir.path();
    write_picture(&dir.join("mural.png"), 200, 100);
    let descriptor = write_descriptor(
        dir,
        "street_mural.json",
        r#"{
            "image": "mural.png",
            "min_corner": [1000, 2000, 5],
            "width": 200,
            "height": 100,
            "tolerance": 0.01
        }"#,
    );
    let output = dir.join("out");

    let cloud = PictureCloudConverter::new(&output)
        .with_formats(ExportFormats::default())
        .convert(&descriptor)
        .unwrap();

    assert_eq!(cloud.name, "street_mural");
    assert_eq!(cloud.point_count, 20_000);
    assert_eq!(cloud.scale_factor.value(), 1.0);

    let las_path = output.join("StreetMural").join("cloud.las");
    let mut reader = las::Reader::from_path(&las_path).unwrap();
    assert_eq!(reader.header().number_of_points(), 20_000);

    // Sample (col=10, row=5) sits at origin + 10u + 5v.
    let point = reader.points().nth(5 * 200 + 10).unwrap().unwrap();
    assert!((point.x - 1010.0).abs() < 1e-3);
    assert!((point.y - 2005.0).abs() < 1e-3);
    assert!((point.z - 5.0).abs() < 1e-3);
    let color = point.color.unwrap();
    assert_eq!((color.red, color.green, color.blue), (10 * 257, 5 * 257, 42 * 257));

    assert!(output.join("StreetMural").join("position.dds").is_file());
    assert!(output.join("StreetMural").join("colour.dds").is_file());

    let manifest = ManifestGenerator::read(&output.join("manifest.json")).unwrap();
    assert_eq!(manifest.clouds.len(), 1);
    assert_eq!(
        manifest.clouds[0].files.las.as_deref(),
        Some("StreetMural/cloud.las")
    );
    assert!(manifest.rejected.is_empty());
}

#[test]
fn stretched_picture_is_rejected_without_output() {
    let temp_dir = tempdir().unwrap();
    let dir = temp_dir.path();
    write_picture(&dir.join("poster.png"), 200, 100);
    let descriptor = write_descriptor(
        dir,
        "poster.json",
        r#"{ "image": "poster.png", "min_corner": [0, 0, 0], "width": 200, "height": 150 }"#,
    );
    let output = dir.join("out");

    let result = PictureCloudConverter::new(&output)
        .with_tolerance(0.01)
        .convert(&descriptor);

    match result {
        Err(PictureCloudError::NonUniformScale { discrepancy, .. }) => {
            assert_eq!(discrepancy, 50.0)
        }
        other => panic!("expected NonUniformScale, got {other:?}"),
    }
    assert!(!output.join("Poster").exists());
    assert!(!output.join("manifest.json").exists());
}

#[test]
fn batch_skips_rejected_pictures_and_records_them() {
    let temp_dir = tempdir().unwrap();
    let dir = temp_dir.path();
    write_picture(&dir.join("good.png"), 40, 30);
    write_picture(&dir.join("bad.png"), 40, 40);

    write_descriptor(
        dir,
        "a_good.json",
        r#"{
            "name": "good",
            "image": "good.png",
            "plane": { "x_axis": [1, 0, 0], "y_axis": [0, 0, 1] },
            "outline": [[0, 0, 0], [4, 0, 0], [4, 0, 3], [0, 0, 3]]
        }"#,
    );
    write_descriptor(
        dir,
        "b_bad.json",
        r#"{ "name": "bad", "image": "bad.png", "min_corner": [0, 0, 0], "width": 4, "height": 3 }"#,
    );
    write_descriptor(
        dir,
        "c_missing.json",
        r#"{ "name": "missing", "image": "nowhere.png", "min_corner": [0, 0, 0], "width": 1, "height": 1 }"#,
    );

    let output = dir.join("out");
    let summary = PictureCloudConverter::new(&output)
        .with_formats(ExportFormats::las_only())
        .convert_batch(dir)
        .unwrap();

    assert_eq!(summary.converted, 1);
    assert_eq!(summary.rejected, 2);

    let manifest = ManifestGenerator::read(&summary.manifest_path).unwrap();
    let good = &manifest.clouds[0];
    assert_eq!(good.name, "good");
    assert_eq!(good.point_count, 40 * 30);
    assert!((good.scale_factor.value() - 0.1).abs() < 1e-12);
    assert_eq!(good.normal, nalgebra::Vector3::new(0.0, -1.0, 0.0));
    assert!(good.files.position.is_none());

    let rejected: Vec<&str> = manifest.rejected.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(rejected, vec!["bad", "missing"]);
    assert!(manifest.rejected[0].reason.contains("non-uniformly"));
}

#[test]
fn check_reports_scale_without_writing() {
    let temp_dir = tempdir().unwrap();
    let dir = temp_dir.path();
    write_picture(&dir.join("tile.png"), 64, 32);
    let descriptor = write_descriptor(
        dir,
        "tile.json",
        r#"{ "image": "tile.png", "min_corner": [0, 0, 0], "width": 16, "height": 8 }"#,
    );
    let output = dir.join("out");

    let scale = PictureCloudConverter::new(&output).check(&descriptor).unwrap();
    assert_eq!(scale.value(), 0.25);
    assert!(!output.exists());
}

#[test]
fn wide_surface_converts_with_a_coarser_las_scale() {
    let temp_dir = tempdir().unwrap();
    let dir = temp_dir.path();
    write_picture(&dir.join("quay.png"), 300, 100);
    let descriptor = write_descriptor(
        dir,
        "quay.json",
        r#"{ "image": "quay.png", "min_corner": [0, 0, 0], "width": 300000, "height": 100000 }"#,
    );
    let output = dir.join("out");

    let cloud = PictureCloudConverter::new(&output)
        .with_formats(ExportFormats::las_only())
        .convert(&descriptor)
        .unwrap();
    assert_eq!(cloud.point_count, 300 * 100);
    assert_eq!(cloud.scale_factor.value(), 1000.0);

    let mut reader = las::Reader::from_path(output.join("Quay").join("cloud.las")).unwrap();
    assert_eq!(reader.header().number_of_points(), 30_000);
    let last = reader.points().last().unwrap().unwrap();
    assert!((last.x - 299_000.0).abs() < 1e-3);
    assert!((last.y - 99_000.0).abs() < 1e-3);
}

#[test]
fn batch_keeps_clouds_with_colliding_names_apart() {
    let temp_dir = tempdir().unwrap();
    let dir = temp_dir.path();
    write_picture(&dir.join("tile.png"), 4, 2);
    for (file, name) in [("first.json", "a_b"), ("second.json", "a-b")] {
        write_descriptor(
            dir,
            file,
            &format!(
                r#"{{ "name": "{name}", "image": "tile.png", "min_corner": [0, 0, 0], "width": 4, "height": 2 }}"#
            ),
        );
    }

    let output = dir.join("out");
    let summary = PictureCloudConverter::new(&output)
        .with_formats(ExportFormats::las_only())
        .convert_batch(dir)
        .unwrap();
    assert_eq!(summary.converted, 2);

    let manifest = ManifestGenerator::read(&summary.manifest_path).unwrap();
    let files: Vec<Option<&str>> = manifest
        .clouds
        .iter()
        .map(|cloud| cloud.files.las.as_deref())
        .collect();
    assert_eq!(files, vec![Some("AB/cloud.las"), Some("AB2/cloud.las")]);
    assert!(output.join("AB").join("cloud.las").is_file());
    assert!(output.join("AB2").join("cloud.las").is_file());
}

#[test]
fn escaping_name_stays_inside_the_output_directory() {
    let temp_dir = tempdir().unwrap();
    let dir = temp_dir.path();
    write_picture(&dir.join("tile.png"), 4, 2);
    let descriptor = write_descriptor(
        dir,
        "tile.json",
        r#"{ "name": "../escape", "image": "tile.png", "min_corner": [0, 0, 0], "width": 4, "height": 2 }"#,
    );
    let output = dir.join("out");

    PictureCloudConverter::new(&output)
        .with_formats(ExportFormats::las_only())
        .convert(&descriptor)
        .unwrap();

    assert!(output.join("Escape").join("cloud.las").is_file());
    assert!(!dir.join("escape").exists());
}
