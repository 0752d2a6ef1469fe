//! File download via Blob URLs.
//!
//! Browsers have no direct "save these bytes" API, so a download is
//! triggered by wrapping the bytes in a `Blob`, pointing a temporary
//! `<a download>` element at its object URL, and clicking it.
//!
//! All functions in this module require a browser environment
//! (`wasm32-unknown-unknown` target).

use maskpaint_core::Download;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;

use crate::raster;

/// Errors that can occur when triggering a file download.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),

    /// The Blob backing the download could not be created.
    #[error(transparent)]
    Blob(#[from] raster::RasterError),
}

impl From<JsValue> for DownloadError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Offer `download` to the user as a file.
///
/// # Errors
///
/// Returns [`DownloadError`] if any browser API call fails.
pub fn save(download: &Download<'_>) -> Result<(), DownloadError> {
    trigger_download(download.bytes, download.file_name, download.mime)
}

/// Trigger a file download of `data` named `filename`.
///
/// The object URL is revoked right after the click.
///
/// # Errors
///
/// Returns [`DownloadError::JsError`] if element creation or insertion
/// fails, or [`DownloadError::Blob`] if the Blob URL cannot be made.
pub fn trigger_download(data: &[u8], filename: &str, mime_type: &str) -> Result<(), DownloadError> {
    let window =
        web_sys::window().ok_or_else(|| DownloadError::JsError("no global window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| DownloadError::JsError("no document".into()))?;

    let url = raster::bytes_to_blob_url(data, mime_type)?;

    let anchor = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|e| DownloadError::JsError(format!("failed to cast element: {e:?}")))?;
    anchor.set_href(&url);
    anchor.set_download(filename);

    let body = document
        .body()
        .ok_or_else(|| DownloadError::JsError("no document body".into()))?;
    body.append_child(&anchor)?;
    anchor.click();

    // The download has started; cleanup failures are not download failures.
    let _ = body.remove_child(&anchor);
    raster::revoke_blob_url(&url);

    log::info!("download started: {filename} ({} bytes)", data.len());
    Ok(())
}
