//! Mask compositing: turn a stroke raster into an exportable mask.
//!
//! The mask starts as opaque black (keep) and the stroke raster is drawn
//! over it with the destination-out blend mode, so painted pixels are
//! erased to transparency rather than painted white. Anti-aliased stroke
//! edges therefore come out as black with partial alpha
//! (`255 - stroke_alpha`), not as grey.

use image::{ImageEncoder, Luma};
use tiny_skia::{BlendMode, Color, IntSize, Pixmap, PixmapPaint, Transform};

use crate::types::{Dimensions, GrayImage, MaskError, RgbaImage};

/// Alpha below which a mask pixel counts as masked in
/// [`MaskImage::to_binary`].
pub const BINARY_ALPHA_THRESHOLD: u8 = 128;

/// A generated mask: straight-alpha RGBA pixels and their PNG encoding.
#[derive(Debug, Clone)]
pub struct MaskImage {
    pixels: RgbaImage,
    png: Vec<u8>,
}

impl MaskImage {
    /// Mask pixels. Opaque black means keep; reduced alpha means edit.
    #[must_use]
    pub const fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// PNG encoding of [`pixels`](Self::pixels).
    #[must_use]
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    /// Mask dimensions; always equal to the source image's.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.pixels.width(), self.pixels.height())
    }

    /// Whether the pixel at `(x, y)` has been cut out at all.
    ///
    /// Out-of-bounds coordinates are never masked.
    #[must_use]
    pub fn is_masked(&self, x: u32, y: u32) -> bool {
        self.dimensions().contains(x, y) && self.pixels.get_pixel(x, y).0[3] < u8::MAX
    }

    /// Number of pixels with any cut-out.
    #[must_use]
    pub fn masked_area(&self) -> usize {
        self.pixels.pixels().filter(|p| p.0[3] < u8::MAX).count()
    }

    /// Single-channel mask for back-ends expecting white-on-black:
    /// 255 where alpha is below [`BINARY_ALPHA_THRESHOLD`], otherwise 0.
    #[must_use]
    pub fn to_binary(&self) -> GrayImage {
        GrayImage::from_fn(self.pixels.width(), self.pixels.height(), |x, y| {
            if self.pixels.get_pixel(x, y).0[3] < BINARY_ALPHA_THRESHOLD {
                Luma([u8::MAX])
            } else {
                Luma([0])
            }
        })
    }
}

/// Composite `strokes` into a mask of size `dimensions`.
///
/// Always computed from scratch: the result depends only on the stroke
/// raster passed in, never on a previous mask. A stroke raster larger or
/// smaller than `dimensions` is drawn at the origin and clipped.
///
/// # Errors
///
/// Returns [`MaskError::Surface`] if either pixmap cannot be allocated
/// (zero-sized dimensions), or [`MaskError::Encode`] if PNG encoding
/// fails.
pub fn generate_mask(strokes: &RgbaImage, dimensions: Dimensions) -> Result<MaskImage, MaskError> {
    let mut mask = Pixmap::new(dimensions.width, dimensions.height).ok_or_else(|| {
        MaskError::Surface(format!(
            "cannot allocate {}x{} mask",
            dimensions.width, dimensions.height
        ))
    })?;
    mask.fill(Color::BLACK);

    let layer = rgba_to_pixmap(strokes)?;
    let paint = PixmapPaint {
        blend_mode: BlendMode::DestinationOut,
        ..PixmapPaint::default()
    };
    mask.draw_pixmap(0, 0, layer.as_ref(), &paint, Transform::identity(), None);

    let pixels = pixmap_to_rgba(&mask);
    let png = encode_png(&pixels)?;
    log::debug!(
        "generated {}x{} mask ({} bytes PNG)",
        dimensions.width,
        dimensions.height,
        png.len()
    );
    Ok(MaskImage { pixels, png })
}

/// PNG-encode an RGBA image.
///
/// # Errors
///
/// Returns [`MaskError::Encode`] if the encoder rejects the buffer.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, MaskError> {
    let mut png_bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| MaskError::Encode(e.to_string()))?;
    Ok(png_bytes)
}

/// PNG-encode a single-channel image.
///
/// # Errors
///
/// Returns [`MaskError::Encode`] if the encoder rejects the buffer.
pub fn encode_gray_png(image: &GrayImage) -> Result<Vec<u8>, MaskError> {
    let mut png_bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::L8,
        )
        .map_err(|e| MaskError::Encode(e.to_string()))?;
    Ok(png_bytes)
}

/// Convert a pixmap (premultiplied RGBA) to an `RgbaImage` (straight RGBA).
pub(crate) fn pixmap_to_rgba(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

/// Convert a straight-alpha `RgbaImage` into a premultiplied pixmap.
fn rgba_to_pixmap(image: &RgbaImage) -> Result<Pixmap, MaskError> {
    let size = IntSize::from_wh(image.width(), image.height()).ok_or_else(|| {
        MaskError::Surface(format!(
            "invalid stroke layer size {}x{}",
            image.width(),
            image.height()
        ))
    })?;

    let mut data = Vec::with_capacity(image.as_raw().len());
    for p in image.pixels() {
        let [r, g, b, a] = p.0;
        for c in [r, g, b] {
            // Rounded c * a / 255.
            #[allow(clippy::cast_possible_truncation)]
            data.push(((u16::from(c) * u16::from(a) + 127) / 255) as u8);
        }
        data.push(a);
    }

    Pixmap::from_vec(data, size)
        .ok_or_else(|| MaskError::Surface("stroke layer buffer size mismatch".into()))
}
