//! maskpaint-io: Browser I/O and Dioxus component library.
//!
//! Handles file uploads, Blob downloads, Blob URL image display, canvas
//! overlay painting, console logging, and provides the UI components
//! for the maskpaint web application.

pub mod components;
pub mod download;
pub mod logging;
pub mod overlay;
pub mod raster;

pub use components::{BrushControl, ExportPanel, FileUpload, MaskActions, MaskCanvas};
