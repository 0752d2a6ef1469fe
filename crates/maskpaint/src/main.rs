use dioxus::prelude::*;
use maskpaint_core::MaskEditor;
use maskpaint_io::{BrushControl, ExportPanel, FileUpload, MaskActions, MaskCanvas};

fn main() {
    maskpaint_io::logging::init(log::LevelFilter::Info);
    dioxus::launch(app);
}

/// Root application component.
///
/// Owns the single editor signal and hands it to every component; all
/// state changes go through `MaskEditor` methods.
fn app() -> Element {
    let editor = use_signal(MaskEditor::default);
    let has_image = editor.read().source().is_some();

    rsx! {
        style { dangerous_inner_html: include_str!("../assets/main.css") }

        div { class: "app",
            header { class: "app-header",
                h1 { class: "title", "maskpaint" }
                p { class: "text-muted text-sm",
                    "Paint over the parts of an image you want regenerated, then export the mask"
                }
            }

            main { class: "app-main",
                div { class: "workspace",
                    if has_image {
                        MaskCanvas { editor }
                        MaskActions { editor }
                    } else {
                        div { class: "placeholder",
                            p { "Upload an image to get started" }
                        }
                    }
                }

                aside { class: "sidebar",
                    BrushControl { editor }
                    ExportPanel { editor }
                }
            }

            footer { class: "app-footer",
                FileUpload { editor }
            }
        }
    }
}
