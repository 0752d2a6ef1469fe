//! Brush size slider.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdScissors;
use maskpaint_core::{BrushRadius, MaskEditor};

/// Props for the [`BrushControl`] component.
#[derive(Props, Clone, PartialEq)]
pub struct BrushControlProps {
    /// Shared editor state.
    editor: Signal<MaskEditor>,
}

/// Slider for the brush radius, applied to strokes begun afterwards.
#[component]
pub fn BrushControl(props: BrushControlProps) -> Element {
    let mut editor = props.editor;
    let radius = editor.read().brush_radius().get();
    let (min, max) = (BrushRadius::MIN, BrushRadius::MAX);

    rsx! {
        div { class: "brush-control",
            div { class: "brush-control__header",
                label { r#for: "brush-radius", class: "control-label",
                    Icon { width: 16, height: 16, icon: LdScissors }
                    "Brush size"
                }
                span { class: "text-secondary tabular-nums", "{radius} px" }
            }
            input {
                r#type: "range",
                id: "brush-radius",
                min: "{min}",
                max: "{max}",
                step: "1",
                value: "{radius}",
                class: "slider",
                oninput: move |e| {
                    match e.value().parse::<u32>() {
                        Ok(v) => editor.write().set_brush_radius(v),
                        Err(err) => {
                            log::warn!("brush slider parse failure: {err:?} from {:?}", e.value());
                        }
                    }
                },
            }
        }
    }
}
