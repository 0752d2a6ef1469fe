//! Shared types for the maskpaint editing core.

use serde::{Deserialize, Serialize};

/// Re-export `RgbaImage` so downstream crates can reference raster data
/// without depending on `image` directly.
pub use image::RgbaImage;

/// Re-export `GrayImage` for the single-channel binary mask.
pub use image::GrayImage;

/// A 2D point in source-image pixel coordinates.
///
/// Uses `f32` because pointer positions arrive with sub-pixel precision
/// and the rasteriser works in `f32`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f32,
    /// Vertical position (pixels from top edge).
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Create new dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether `(x, y)` lies inside the image.
    #[must_use]
    pub const fn contains(self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }
}

/// Brush radius in on-screen pixels, always within
/// [`MIN`](Self::MIN)..=[`MAX`](Self::MAX).
///
/// The brush keeps its apparent size however far the image is scaled
/// for display; see [`scaled`](Self::scaled). A radius applies to strokes begun after it was set; strokes already
/// drawn keep the radius they were drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct BrushRadius(u32);

impl BrushRadius {
    /// Smallest brush radius.
    pub const MIN: u32 = 1;
    /// Largest brush radius.
    pub const MAX: u32 = 50;
    /// Radius used until the user moves the slider.
    pub const DEFAULT: Self = Self(10);

    /// Create a radius, clamping `px` into the allowed range.
    #[must_use]
    pub fn new(px: u32) -> Self {
        Self(px.clamp(Self::MIN, Self::MAX))
    }

    /// Radius in pixels.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Radius in image pixels when one on-screen pixel spans `scale`
    /// image pixels.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // at most 50
    pub fn scaled(self, scale: f32) -> f32 {
        self.0 as f32 * scale
    }
}

impl Default for BrushRadius {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u32> for BrushRadius {
    fn from(px: u32) -> Self {
        Self::new(px)
    }
}

impl From<BrushRadius> for u32 {
    fn from(radius: BrushRadius) -> Self {
        radius.0
    }
}

/// Encoded formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceFormat {
    /// `image/jpeg`
    Jpeg,
    /// `image/png`
    Png,
}

impl SourceFormat {
    /// All accepted formats.
    pub const ALL: [Self; 2] = [Self::Jpeg, Self::Png];

    /// Match a MIME type exactly (ASCII case-insensitive).
    ///
    /// Aliases such as `image/jpg` or `image/pjpeg` are not accepted.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.mime().eq_ignore_ascii_case(mime.trim()))
    }

    /// Guess the format from a file name extension.
    ///
    /// Only used when the host supplies no MIME type at all.
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        if ext.eq_ignore_ascii_case("png") {
            Some(Self::Png)
        } else if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") {
            Some(Self::Jpeg)
        } else {
            None
        }
    }

    /// The MIME type string.
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Preferred file extension (without the dot).
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    pub(crate) const fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
        }
    }
}

/// The decoded original upload.
///
/// Keeps the untouched encoded bytes alongside the decoded pixels so the
/// original can be exported without re-encoding.
///
/// Does not derive `PartialEq`; wrap in `Rc` and compare pointers when
/// diffing UI props.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub(crate) pixels: RgbaImage,
    pub(crate) format: SourceFormat,
    pub(crate) encoded: Vec<u8>,
}

impl SourceImage {
    /// Decoded RGBA pixels.
    #[must_use]
    pub const fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Natural dimensions of the decoded image.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.pixels.width(), self.pixels.height())
    }

    /// The format the upload was accepted as.
    #[must_use]
    pub const fn format(&self) -> SourceFormat {
        self.format
    }

    /// The original encoded bytes.
    #[must_use]
    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }
}

/// Errors produced by the editing core.
#[derive(Debug, thiserror::Error)]
pub enum MaskError {
    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input is not one of the accepted formats.
    #[error("unsupported image type: {0}")]
    UnsupportedFormat(String),

    /// PNG encoding of an output failed.
    #[error("failed to encode image: {0}")]
    Encode(String),

    /// The raster surface could not be allocated.
    #[error("drawing surface error: {0}")]
    Surface(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn brush_radius_is_clamped() {
        assert_eq!(BrushRadius::new(0).get(), 1);
        assert_eq!(BrushRadius::new(25).get(), 25);
        assert_eq!(BrushRadius::new(500).get(), 50);
        assert_eq!(BrushRadius::default().get(), 10);
    }

    #[test]
    fn brush_radius_scales_to_image_pixels() {
        let radius = BrushRadius::new(50);
        assert!((radius.scaled(1.0) - 50.0).abs() < f32::EPSILON);
        // A 4000px wide image shown 600px wide.
        assert!((radius.scaled(4000.0 / 600.0) - 333.333_34).abs() < 1e-3);
    }

    #[test]
    fn brush_radius_deserializes_with_clamping() {
        let radius: BrushRadius = serde_json::from_str("99").unwrap();
        assert_eq!(radius.get(), BrushRadius::MAX);
    }

    #[test]
    fn mime_matching_is_exact() {
        assert_eq!(SourceFormat::from_mime("image/png"), Some(SourceFormat::Png));
        assert_eq!(SourceFormat::from_mime("IMAGE/JPEG"), Some(SourceFormat::Jpeg));
        assert_eq!(SourceFormat::from_mime("image/jpg"), None);
        assert_eq!(SourceFormat::from_mime("image/webp"), None);
        assert_eq!(SourceFormat::from_mime(""), None);
    }

    #[test]
    fn file_name_fallback() {
        assert_eq!(SourceFormat::from_file_name("a.JPEG"), Some(SourceFormat::Jpeg));
        assert_eq!(SourceFormat::from_file_name("photo.jpg"), Some(SourceFormat::Jpeg));
        assert_eq!(SourceFormat::from_file_name("scan.png"), Some(SourceFormat::Png));
        assert_eq!(SourceFormat::from_file_name("anim.gif"), None);
        assert_eq!(SourceFormat::from_file_name("png"), None);
    }

    #[test]
    fn dimensions_contains() {
        let d = Dimensions::new(3, 2);
        assert!(d.contains(2, 1));
        assert!(!d.contains(3, 0));
        assert!(!d.contains(0, 2));
    }
}
