//! Integration test: upload a PNG, paint over it, and export the mask.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use maskpaint_core::{Dimensions, IngestOutcome, MaskEditor, Point};

/// Encode a 600x400 gradient as PNG, standing in for a user upload.
fn upload_png() -> Vec<u8> {
    let img = image::RgbaImage::from_fn(600, 400, |x, y| {
        #[allow(clippy::cast_possible_truncation)]
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    });
    let mut buf = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    image::ImageEncoder::write_image(
        encoder,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ExtendedColorType::Rgba8,
    )
    .unwrap();
    buf
}

#[test]
fn stroke_over_centre_cuts_out_centre_only() {
    let mut editor = MaskEditor::default();
    let outcome = editor.ingest("image/png", &upload_png()).unwrap();
    assert_eq!(outcome, IngestOutcome::Loaded(Dimensions::new(600, 400)));

    editor.set_brush_radius(10);
    editor.begin_stroke(Point::new(280.0, 200.0));
    editor.extend_stroke(Point::new(300.0, 200.0));
    editor.extend_stroke(Point::new(320.0, 205.0));
    editor.end_stroke();

    let mask = editor
        .generate_mask()
        .unwrap()
        .expect("an image is loaded");

    assert_eq!(mask.dimensions(), Dimensions::new(600, 400));
    assert!(mask.is_masked(300, 200));
    assert_eq!(mask.pixels().get_pixel(0, 0).0, [0, 0, 0, 255]);
    assert_eq!(mask.pixels().get_pixel(599, 399).0, [0, 0, 0, 255]);

    // The exported PNG decodes back to the same mask.
    let exported = editor.export_mask().expect("mask exists");
    let decoded = image::load_from_memory(exported.bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (600, 400));
    assert_eq!(decoded.get_pixel(300, 200).0[3], 0);
    assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0, 255]);
}

#[test]
fn brush_change_between_strokes_is_not_retroactive() {
    let mut editor = MaskEditor::default();
    editor.ingest("image/png", &upload_png()).unwrap();

    editor.set_brush_radius(4);
    editor.begin_stroke(Point::new(100.0, 100.0));
    editor.extend_stroke(Point::new(200.0, 100.0));
    editor.end_stroke();
    let thin = editor.generate_mask().unwrap().unwrap().clone();

    editor.set_brush_radius(30);
    editor.begin_stroke(Point::new(100.0, 300.0));
    editor.extend_stroke(Point::new(200.0, 300.0));
    editor.end_stroke();
    let both = editor.generate_mask().unwrap().unwrap();

    // The first stroke's footprint is unchanged by the radius change.
    for y in 80..120 {
        assert_eq!(
            thin.pixels().get_pixel(150, y),
            both.pixels().get_pixel(150, y),
            "row {y}"
        );
    }
    assert!(!both.is_masked(150, 110));
    assert!(both.is_masked(150, 325));
}
