//! Mask action buttons: generate, clear, and drop the image.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdEraser, LdImage, LdX};
use maskpaint_core::MaskEditor;

/// Props for the [`MaskActions`] component.
#[derive(Props, Clone, PartialEq)]
pub struct MaskActionsProps {
    /// Shared editor state.
    editor: Signal<MaskEditor>,
}

/// Buttons acting on the loaded image. Hidden until an image is loaded.
#[component]
pub fn MaskActions(props: MaskActionsProps) -> Element {
    let mut editor = props.editor;
    let mut generating = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    if editor.read().source().is_none() {
        return rsx! {};
    }

    let generate = move |_| {
        generating.set(true);
        error.set(None);
        spawn(async move {
            // Let the browser paint the busy state before compositing.
            gloo_timers::future::TimeoutFuture::new(0).await;
            if let Err(e) = editor.write().generate_mask() {
                log::error!("mask generation failed: {e}");
                error.set(Some(format!("Mask generation failed: {e}")));
            }
            generating.set(false);
        });
    };

    let clear = move |_| {
        editor.write().clear_canvas();
        error.set(None);
    };

    let reset = move |_| {
        editor.write().reset();
        error.set(None);
    };

    let busy = generating();

    rsx! {
        div { class: "actions",
            button {
                class: if busy { "btn btn-disabled" } else { "btn btn-primary" },
                disabled: busy,
                onclick: generate,
                Icon { width: 18, height: 18, icon: LdImage }
                if busy { "Generating..." } else { "Generate Mask" }
            }
            button { class: "btn btn-secondary", onclick: clear,
                Icon { width: 18, height: 18, icon: LdEraser }
                "Clear Canvas"
            }
            button {
                class: "btn btn-secondary",
                title: "Remove the image and start over",
                onclick: reset,
                Icon { width: 18, height: 18, icon: LdX }
                "Drop image"
            }
        }
        if let Some(ref err) = error() {
            p { class: "text-error text-sm", "{err}" }
        }
    }
}
