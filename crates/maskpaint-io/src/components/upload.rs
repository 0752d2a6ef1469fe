//! File upload component with drag-and-drop and file picker.

use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdUpload;
use maskpaint_core::{IngestOutcome, MaskEditor, SourceFormat, ingest};

/// Value for the picker's `accept` attribute.
const ACCEPT: &str = "image/jpeg,image/png";

/// The MIME type to ingest an upload as.
///
/// Prefers the type the browser reports. Some platforms report none for
/// dropped files, in which case the file name's extension decides.
/// Returns an empty string when neither yields anything.
fn upload_mime(content_type: Option<&str>, name: &str) -> String {
    match content_type.map(str::trim) {
        Some(mime) if !mime.is_empty() => mime.to_owned(),
        _ => SourceFormat::from_file_name(name)
            .map_or_else(String::new, |format| format.mime().to_owned()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum StatusMessage {
    Loaded(String),
    Failed(String),
}

/// The drop zone's report on the last upload, stamped with the input
/// epoch it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct UploadStatus {
    epoch: u64,
    message: Option<StatusMessage>,
}

impl UploadStatus {
    const fn loaded(epoch: u64, name: String) -> Self {
        Self {
            epoch,
            message: Some(StatusMessage::Loaded(name)),
        }
    }

    const fn failed(epoch: u64, error: String) -> Self {
        Self {
            epoch,
            message: Some(StatusMessage::Failed(error)),
        }
    }

    /// The message to show, or `None` once the editor has been reset
    /// past the epoch it was recorded in.
    fn current(&self, epoch: u64) -> Option<&StatusMessage> {
        self.message.as_ref().filter(|_| self.epoch == epoch)
    }
}

/// Props for the [`FileInput`] component.
#[derive(Props, Clone, PartialEq)]
struct FileInputProps {
    /// A new value mounts a fresh `<input>`, so the same file can be
    /// picked again.
    epoch: u64,
    /// Called when files are picked.
    onchange: EventHandler<FormEvent>,
}

/// The hidden `<input type="file">`, keyed on the input epoch.
///
/// Keys are only compared between siblings of a list, so the input is
/// emitted as a one-element list for a new key to replace it.
#[component]
fn FileInput(props: FileInputProps) -> Element {
    let onchange = props.onchange;
    rsx! {
        {std::iter::once(rsx! {
            input {
                key: "{props.epoch}",
                r#type: "file",
                accept: ACCEPT,
                class: "hidden",
                onchange: move |evt| onchange.call(evt),
            }
        })}
    }
}

/// Props for the [`FileUpload`] component.
#[derive(Props, Clone, PartialEq)]
pub struct FileUploadProps {
    /// Shared editor state.
    editor: Signal<MaskEditor>,
}

/// A drag-and-drop zone with a file picker button.
///
/// Accepts JPEG and PNG. Other types are ignored without a message.
/// Only the first file of a multi-file selection or drop is used.
#[component]
pub fn FileUpload(props: FileUploadProps) -> Element {
    let mut editor = props.editor;
    let mut status = use_signal(UploadStatus::default);

    // Shared by the picker and drop paths.
    let process_files = move |files: Vec<FileData>| async move {
        let Some(file) = files.first() else {
            return;
        };
        let name = file.name();
        let mime = upload_mime(file.content_type().as_deref(), &name);
        let epoch = editor.peek().input_epoch();
        let Some(ticket) = editor.write().begin_ingest(&mime) else {
            return;
        };
        let bytes = match file.read_bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                status.set(UploadStatus::failed(
                    epoch,
                    format!("Failed to read file: {e}"),
                ));
                return;
            }
        };
        let decoded = ingest::decode(&bytes, ticket.format());
        match editor.write().complete_ingest(ticket, decoded) {
            Ok(IngestOutcome::Loaded(_)) => {
                status.set(UploadStatus::loaded(epoch, name));
            }
            Ok(IngestOutcome::Ignored | IngestOutcome::Stale) => {}
            Err(e) => {
                log::warn!("could not load {name}: {e}");
                status.set(UploadStatus::failed(
                    epoch,
                    format!("Could not load {name}: {e}"),
                ));
            }
        }
    };

    let handle_files = move |evt: FormEvent| {
        spawn(async move {
            process_files(evt.files()).await;
        });
    };

    let handle_drop = move |evt: DragEvent| async move {
        evt.prevent_default();
        editor.write().set_dragging(false);
        process_files(evt.files()).await;
    };

    let (dragging, epoch) = {
        let state = editor.read();
        (state.is_dragging(), state.input_epoch())
    };
    let zone_class = if dragging {
        "drop-zone drop-zone--active"
    } else {
        "drop-zone"
    };
    let message = status.read().current(epoch).cloned();

    rsx! {
        div {
            class: "{zone_class}",
            ondragover: move |evt| {
                evt.prevent_default();
                if !editor.peek().is_dragging() {
                    editor.write().set_dragging(true);
                }
            },
            ondragleave: move |_| {
                if editor.peek().is_dragging() {
                    editor.write().set_dragging(false);
                }
            },
            ondrop: handle_drop,

            Icon { width: 32, height: 32, icon: LdUpload }

            match message {
                Some(StatusMessage::Loaded(name)) => rsx! {
                    p { class: "text-success", "Loaded: {name}" }
                },
                Some(StatusMessage::Failed(err)) => rsx! {
                    p { class: "text-error", "{err}" }
                },
                None => rsx! {},
            }

            p { class: "text-secondary", "Drop an image here or " }

            label { class: "btn btn-primary",
                FileInput { epoch, onchange: handle_files }
                "Choose File"
            }

            p { class: "text-muted text-sm", "JPEG or PNG" }
        }
    }
}
