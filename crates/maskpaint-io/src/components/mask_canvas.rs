//! The painting surface: source image with a stroke overlay on top.

use dioxus::prelude::*;
use maskpaint_core::{BrushMark, DrawingSurface, MaskEditor, Point};

use super::{BlobUrlCache, cached_blob_url, release_blob_url, revoke_cached_blob_url};
use crate::overlay;

/// Element id of the stroke overlay canvas.
pub const OVERLAY_ID: &str = "maskpaint-overlay";

/// Props for the [`MaskCanvas`] component.
#[derive(Props, Clone, PartialEq)]
pub struct MaskCanvasProps {
    /// Shared editor state.
    editor: Signal<MaskEditor>,
}

/// Where a pointer event lands on the image, with the display scale
/// there.
fn pointer_target(editor: &Signal<MaskEditor>, evt: &PointerEvent) -> Option<(Point, f32)> {
    let natural = editor.peek().source()?.dimensions();
    let rect = match overlay::rendered_rect(OVERLAY_ID) {
        Ok(rect) => rect,
        Err(e) => {
            log::warn!("pointer mapping failed: {e}");
            return None;
        }
    };
    let client = evt.client_coordinates();
    let point = overlay::to_image_point(client.x, client.y, rect, natural)?;
    Some((point, overlay::display_scale(rect, natural).unwrap_or(1.0)))
}

/// Copy fresh paint onto the overlay.
fn mirror(mark: Option<BrushMark>) {
    if let Some(mark) = mark
        && let Err(e) = overlay::paint_mark(OVERLAY_ID, mark)
    {
        log::warn!("overlay paint failed: {e}");
    }
}

/// Shows the uploaded image and captures freehand strokes over it.
///
/// Renders nothing until an image is loaded. The overlay canvas has the
/// image's natural resolution. Pointer input paints onto it mark by
/// mark; it is repainted from the stroke layer only when the layer is
/// replaced or wiped.
#[component]
pub fn MaskCanvas(props: MaskCanvasProps) -> Element {
    let mut editor = props.editor;

    let source_url: BlobUrlCache = use_signal(|| None);
    use_drop(move || revoke_cached_blob_url(source_url));

    let layer_revision = use_memo(move || editor.read().layer_revision());
    use_effect(move || {
        let _ = layer_revision();
        let state = editor.peek();
        if state.source().is_none() {
            return;
        }
        let Some(strokes) = state.surface().raster() else {
            return;
        };
        if let Err(e) = overlay::repaint(OVERLAY_ID, &strokes) {
            log::warn!("overlay repaint failed: {e}");
        }
    });

    let state = editor.read();
    let Some(source) = state.source() else {
        if source_url.peek().is_some() {
            release_blob_url(source_url);
        }
        return rsx! {};
    };

    let url = match cached_blob_url(
        source_url,
        state.source_revision(),
        source.encoded(),
        source.format().mime(),
    ) {
        Ok(url) => url,
        Err(e) => {
            return rsx! {
                p { class: "text-error text-sm", "Failed to display image: {e}" }
            };
        }
    };

    let dims = source.dimensions();
    drop(state);

    rsx! {
        div {
            class: "mask-canvas",
            style: "aspect-ratio: {dims.width} / {dims.height};",
            img {
                src: "{url}",
                class: "mask-canvas__image",
                alt: "Uploaded image",
                draggable: "false",
            }
            canvas {
                id: OVERLAY_ID,
                class: "mask-canvas__overlay",
                width: "{dims.width}",
                height: "{dims.height}",
                onpointerdown: move |evt| {
                    evt.prevent_default();
                    if let Some((p, scale)) = pointer_target(&editor, &evt) {
                        let mark = {
                            let mut state = editor.write();
                            state.set_display_scale(scale);
                            state.begin_stroke(p)
                        };
                        mirror(mark);
                    }
                },
                onpointermove: move |evt| {
                    if !editor.peek().is_stroking() {
                        return;
                    }
                    if let Some((p, _)) = pointer_target(&editor, &evt) {
                        let mark = editor.write().extend_stroke(p);
                        mirror(mark);
                    }
                },
                onpointerup: move |_| {
                    if editor.peek().is_stroking() {
                        editor.write().end_stroke();
                    }
                },
                onpointerleave: move |_| {
                    if editor.peek().is_stroking() {
                        editor.write().end_stroke();
                    }
                },
            }
        }
    }
}
