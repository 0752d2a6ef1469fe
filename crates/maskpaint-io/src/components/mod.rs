//! Dioxus UI components for maskpaint.
//!
//! Provides the upload drop zone, the painting canvas, the brush size
//! control, the mask action buttons, and the export panel. Every
//! component takes the shared editor signal and mutates it only through
//! `MaskEditor` methods.

mod actions;
mod brush_control;
mod export;
mod mask_canvas;
mod upload;

pub use actions::MaskActions;
pub use brush_control::BrushControl;
pub use export::ExportPanel;
pub use mask_canvas::{MaskCanvas, OVERLAY_ID};
pub use upload::FileUpload;

use dioxus::prelude::*;

use crate::raster::{self, RasterError};

/// A displayed Blob URL and the editor revision it was made for.
pub(crate) type BlobUrlCache = Signal<Option<(u64, String)>>;

/// Object URL for `bytes`, reused while `revision` is unchanged.
///
/// A URL for an older revision is revoked when replaced.
pub(crate) fn cached_blob_url(
    mut cache: BlobUrlCache,
    revision: u64,
    bytes: &[u8],
    mime: &str,
) -> Result<String, RasterError> {
    if let Some((cached, url)) = cache.peek().as_ref()
        && *cached == revision
    {
        return Ok(url.clone());
    }
    let url = raster::bytes_to_blob_url(bytes, mime)?;
    if let Some((_, old)) = cache.write().replace((revision, url.clone())) {
        raster::revoke_blob_url(&old);
    }
    Ok(url)
}

/// Revoke and forget the cached URL, if any.
pub(crate) fn release_blob_url(mut cache: BlobUrlCache) {
    if let Some((_, url)) = cache.write().take() {
        raster::revoke_blob_url(&url);
    }
}

/// Revoke the cached URL without touching the signal, for `use_drop`.
pub(crate) fn revoke_cached_blob_url(cache: BlobUrlCache) {
    if let Some((_, ref url)) = *cache.peek() {
        raster::revoke_blob_url(url);
    }
}
