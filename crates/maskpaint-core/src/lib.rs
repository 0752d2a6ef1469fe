//! maskpaint-core: Pure mask editing core (sans-IO).
//!
//! Covers the parts of the mask editor that do not touch the browser:
//! decoding an accepted upload, capturing freehand strokes on a raster
//! drawing surface, compositing those strokes into a mask, and describing
//! the files offered for download.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and returns structured data. All browser interaction
//! lives in `maskpaint-io`.

pub mod compositor;
pub mod editor;
pub mod ingest;
pub mod stroke;
pub mod surface;
pub mod types;

pub use compositor::{MaskImage, generate_mask};
pub use editor::{Download, IngestOutcome, IngestTicket, MASK_FILE_NAME, MaskEditor};
pub use stroke::{BrushMark, Stroke, StrokeLayer};
pub use surface::{DrawingSurface, PixmapSurface};
pub use types::{
    BrushRadius, Dimensions, GrayImage, MaskError, Point, RgbaImage, SourceFormat, SourceImage,
};
