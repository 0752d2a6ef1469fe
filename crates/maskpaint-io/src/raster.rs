//! Blob URLs for encoded images.
//!
//! The source preview and the mask preview are shown as `<img>` elements
//! pointing at object URLs over the already-encoded bytes, so nothing is
//! re-encoded for display.

use wasm_bindgen::JsValue;
use web_sys::BlobPropertyBag;

/// Errors that can occur creating a Blob URL.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for RasterError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Wrap encoded image bytes in a Blob and return its object URL.
///
/// The returned URL must be revoked via [`revoke_blob_url`] when no
/// longer needed to avoid memory leaks.
///
/// # Errors
///
/// Returns [`RasterError::JsError`] if Blob or URL creation fails.
pub fn bytes_to_blob_url(bytes: &[u8], mime: &str) -> Result<String, RasterError> {
    let uint8_array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::new();
    parts.push(&uint8_array);

    let opts = BlobPropertyBag::new();
    opts.set_type(mime);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &opts)?;

    Ok(web_sys::Url::create_object_url_with_blob(&blob)?)
}

/// Revoke a Blob URL previously created by [`bytes_to_blob_url`].
///
/// Best-effort: the URL may already have been revoked.
pub fn revoke_blob_url(url: &str) {
    let _ = web_sys::Url::revoke_object_url(url);
}
