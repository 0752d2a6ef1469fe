//! Export panel: original and mask previews with download buttons.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdDownload, LdFileDown};
use maskpaint_core::{Download, MaskEditor};

use super::{BlobUrlCache, cached_blob_url, release_blob_url, revoke_cached_blob_url};
use crate::download;

/// Offer the file `pick` selects from the editor, recording any failure.
fn save(
    editor: Signal<MaskEditor>,
    mut export_error: Signal<Option<String>>,
    pick: fn(&MaskEditor) -> Option<Download<'_>>,
) {
    let state = editor.read();
    let Some(file) = pick(&state) else {
        return;
    };
    if let Err(e) = download::save(&file) {
        log::warn!("download of {} failed: {e}", file.file_name);
        export_error.set(Some(format!("Download failed: {e}")));
    } else {
        export_error.set(None);
    }
}

/// Blob URL for a preview, or `None` (logged) if it cannot be made.
fn preview_url(cache: BlobUrlCache, revision: u64, file: &Download<'_>) -> Option<String> {
    cached_blob_url(cache, revision, file.bytes, file.mime)
        .inspect_err(|e| log::warn!("preview of {} failed: {e}", file.file_name))
        .ok()
}

/// Props for the [`ExportPanel`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ExportPanelProps {
    /// Shared editor state.
    editor: Signal<MaskEditor>,
}

/// Original and mask previews with a download button for each.
///
/// Shown only while both a source image and a current mask exist.
#[component]
pub fn ExportPanel(props: ExportPanelProps) -> Element {
    let editor = props.editor;
    let mut export_error = use_signal(|| Option::<String>::None);
    let original_url: BlobUrlCache = use_signal(|| None);
    let mask_url: BlobUrlCache = use_signal(|| None);

    use_drop(move || {
        revoke_cached_blob_url(original_url);
        revoke_cached_blob_url(mask_url);
    });

    let state = editor.read();
    let (Some(original), Some(mask)) = (state.export_original(), state.export_mask()) else {
        if mask_url.peek().is_some() {
            release_blob_url(original_url);
            release_blob_url(mask_url);
        }
        if export_error.peek().is_some() {
            export_error.set(None);
        }
        return rsx! {};
    };
    let original_src = preview_url(original_url, state.source_revision(), &original);
    let mask_src = preview_url(mask_url, state.mask_revision(), &mask);
    drop(state);

    rsx! {
        div { class: "export-panel",
            h3 { class: "panel-heading", "Export" }

            div { class: "preview-pair",
                if let Some(ref src) = original_src {
                    figure {
                        img { src: "{src}", class: "preview", alt: "Original image" }
                        figcaption { class: "text-muted text-sm", "Original" }
                    }
                }
                if let Some(ref src) = mask_src {
                    figure {
                        img { src: "{src}", class: "preview mask-preview", alt: "Generated mask" }
                        figcaption { class: "text-muted text-sm", "Mask" }
                    }
                }
            }

            if let Some(ref err) = export_error() {
                p { class: "text-error text-sm", "{err}" }
            }

            div { class: "actions",
                button {
                    class: "btn btn-primary",
                    onclick: move |_| save(editor, export_error, MaskEditor::export_original),
                    Icon { width: 18, height: 18, icon: LdDownload }
                    "Download Original"
                }
                button {
                    class: "btn btn-primary",
                    onclick: move |_| save(editor, export_error, MaskEditor::export_mask),
                    Icon { width: 18, height: 18, icon: LdFileDown }
                    "Download Mask"
                }
            }
        }
    }
}
