//! Runs the built binary against images synthesised on disk.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;
use std::process::Command;

/// A scratch directory unique to one test.
fn scratch(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("maskpaint-cli-{}-{test}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_png(path: &PathBuf, width: u32, height: u32) {
    image::RgbImage::from_pixel(width, height, image::Rgb([90, 140, 200]))
        .save(path)
        .unwrap();
}

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_maskpaint-cli"))
}

#[test]
fn writes_mask_and_original() {
    let dir = scratch("mask");
    let image = dir.join("photo.png");
    let strokes = dir.join("strokes.json");
    let mask = dir.join("mask.png");
    let original = dir.join("copy.png");
    write_png(&image, 600, 400);
    std::fs::write(
        &strokes,
        r#"{"strokes":[{"points":[{"x":280.0,"y":200.0},{"x":320.0,"y":200.0}]}]}"#,
    )
    .unwrap();

    let status = bin()
        .arg(&image)
        .arg("--strokes")
        .arg(&strokes)
        .arg("--output")
        .arg(&mask)
        .arg("--original")
        .arg(&original)
        .status()
        .unwrap();
    assert!(status.success());

    let decoded = image::open(&mask).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (600, 400));
    assert_eq!(decoded.get_pixel(300, 200).0[3], 0);
    assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0, 255]);
    // Default radius 10: 15px off the stroke line is untouched.
    assert_eq!(decoded.get_pixel(300, 215).0[3], 255);

    assert_eq!(
        std::fs::read(&original).unwrap(),
        std::fs::read(&image).unwrap()
    );
}

#[test]
fn binary_mask_is_white_on_black() {
    let dir = scratch("binary");
    let image = dir.join("photo.png");
    let strokes = dir.join("strokes.json");
    let mask = dir.join("mask.png");
    write_png(&image, 64, 64);
    std::fs::write(
        &strokes,
        r#"{"strokes":[{"radius":6,"points":[{"x":32.0,"y":32.0}]}]}"#,
    )
    .unwrap();

    let status = bin()
        .arg(&image)
        .args(["--binary", "--strokes"])
        .arg(&strokes)
        .arg("--output")
        .arg(&mask)
        .status()
        .unwrap();
    assert!(status.success());

    let decoded = image::open(&mask).unwrap();
    assert_eq!(decoded.color(), image::ColorType::L8);
    let gray = decoded.to_luma8();
    assert_eq!(gray.get_pixel(32, 32).0, [255]);
    assert_eq!(gray.get_pixel(2, 2).0, [0]);
}

#[test]
fn unsupported_image_fails() {
    let dir = scratch("unsupported");
    let image = dir.join("notes.txt");
    let strokes = dir.join("strokes.json");
    std::fs::write(&image, "plain text").unwrap();
    std::fs::write(&strokes, r#"{"strokes":[]}"#).unwrap();

    let status = bin()
        .arg(&image)
        .arg("--strokes")
        .arg(&strokes)
        .arg("--output")
        .arg(dir.join("mask.png"))
        .status()
        .unwrap();
    assert!(!status.success());
}
