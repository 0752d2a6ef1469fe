//! Image ingestion: decode an accepted upload into a [`SourceImage`].
//!
//! Accepts raw JPEG or PNG bytes together with the format the host
//! declared for them and produces an RGBA bitmap the drawing surface can
//! render. Format acceptance itself lives on [`SourceFormat`].

use crate::types::{MaskError, SourceFormat, SourceImage};

/// Decode raw image bytes as the declared `format`.
///
/// The declared format is trusted: a PNG labelled as JPEG fails to
/// decode rather than being silently sniffed.
///
/// # Errors
///
/// Returns [`MaskError::EmptyInput`] if `bytes` is empty.
/// Returns [`MaskError::ImageDecode`] if the data is corrupt or does not
/// match `format`.
pub fn decode(bytes: &[u8], format: SourceFormat) -> Result<SourceImage, MaskError> {
    if bytes.is_empty() {
        return Err(MaskError::EmptyInput);
    }

    let img = image::load_from_memory_with_format(bytes, format.image_format())?;
    log::debug!(
        "decoded {} upload: {}x{}",
        format.mime(),
        img.width(),
        img.height()
    );

    Ok(SourceImage {
        pixels: img.to_rgba8(),
        format,
        encoded: bytes.to_vec(),
    })
}

/// Determine the format of raw bytes by inspecting their signature.
///
/// Used by the CLI when a file extension is missing or unknown.
///
/// # Errors
///
/// Returns [`MaskError::UnsupportedFormat`] if the bytes are neither
/// JPEG nor PNG.
pub fn sniff_format(bytes: &[u8]) -> Result<SourceFormat, MaskError> {
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Png) => Ok(SourceFormat::Png),
        Ok(image::ImageFormat::Jpeg) => Ok(SourceFormat::Jpeg),
        Ok(other) => Err(MaskError::UnsupportedFormat(format!("{other:?}"))),
        Err(_) => Err(MaskError::UnsupportedFormat("unrecognized data".into())),
    }
}
