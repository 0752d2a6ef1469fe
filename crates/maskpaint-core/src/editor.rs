//! The mask editor: one explicit state struct with its transitions.
//!
//! [`MaskEditor`] owns the source image, the drawing surface (and with it
//! the stroke layer), the generated mask, the brush radius, and the drag
//! hover flag. Every mutation goes through a method here so the pieces
//! cannot drift out of step:
//!
//! | event               | source   | strokes  | mask     |
//! |---------------------|----------|----------|----------|
//! | image ingested      | replaced | cleared  | cleared  |
//! | unsupported type    | -        | -        | -        |
//! | stroke input        | -        | appended | cleared  |
//! | clear canvas        | -        | cleared  | cleared  |
//! | generate mask       | -        | -        | computed |
//! | reset               | cleared  | cleared  | cleared  |
//!
//! Ingestion may be split into [`begin_ingest`](MaskEditor::begin_ingest)
//! and [`complete_ingest`](MaskEditor::complete_ingest) around an async
//! file read. Each begin issues a new [`IngestTicket`]; only the most
//! recently issued ticket may complete, so an older, slower read can
//! never overwrite a newer upload.

use crate::compositor::{self, MaskImage};
use crate::ingest;
use crate::stroke::BrushMark;
use crate::surface::{DrawingSurface, PixmapSurface};
use crate::types::{BrushRadius, Dimensions, MaskError, Point, SourceFormat, SourceImage};

/// Base name (without extension) for the exported original.
pub const ORIGINAL_FILE_STEM: &str = "original_image";

/// File name for the exported mask.
pub const MASK_FILE_NAME: &str = "mask_image.png";

/// Identifies one in-flight ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestTicket {
    generation: u64,
    format: SourceFormat,
}

impl IngestTicket {
    /// The format the upload was accepted as.
    #[must_use]
    pub const fn format(self) -> SourceFormat {
        self.format
    }
}

/// What an ingestion attempt did to the editor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// A new source image is loaded.
    Loaded(Dimensions),
    /// The file type is not accepted; state is unchanged.
    Ignored,
    /// A newer ingestion was started meanwhile; this result was dropped.
    Stale,
}

/// A file ready to be saved by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Download<'a> {
    /// File contents.
    pub bytes: &'a [u8],
    /// Suggested file name.
    pub file_name: &'a str,
    /// MIME type of `bytes`.
    pub mime: &'static str,
}

/// Editor state for one image-and-mask session.
#[derive(Debug)]
pub struct MaskEditor<S = PixmapSurface> {
    surface: S,
    source: Option<SourceImage>,
    mask: Option<MaskImage>,
    dragging: bool,
    ingest_generation: u64,
    input_epoch: u64,
    source_revision: u64,
    mask_revision: u64,
    layer_revision: u64,
    original_file_name: String,
}

impl Default for MaskEditor<PixmapSurface> {
    fn default() -> Self {
        Self::new(PixmapSurface::new())
    }
}

impl<S: DrawingSurface> MaskEditor<S> {
    /// Create an empty editor over `surface`.
    ///
    /// The surface's brush radius is reset to the default.
    pub fn new(mut surface: S) -> Self {
        surface.set_brush_radius(BrushRadius::DEFAULT);
        Self {
            surface,
            source: None,
            mask: None,
            dragging: false,
            ingest_generation: 0,
            input_epoch: 0,
            source_revision: 0,
            mask_revision: 0,
            layer_revision: 0,
            original_file_name: String::new(),
        }
    }

    /// The loaded source image.
    #[must_use]
    pub const fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    /// The most recently generated mask, if still valid.
    #[must_use]
    pub const fn mask(&self) -> Option<&MaskImage> {
        self.mask.as_ref()
    }

    /// The drawing surface.
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Current brush radius.
    #[must_use]
    pub fn brush_radius(&self) -> BrushRadius {
        self.surface.brush_radius()
    }

    /// Whether a drag is hovering over the drop target.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Incremented on every reset; hosts key their file input on it so
    /// the same file can be picked again.
    #[must_use]
    pub const fn input_epoch(&self) -> u64 {
        self.input_epoch
    }

    /// Changes whenever a new source image is loaded.
    #[must_use]
    pub const fn source_revision(&self) -> u64 {
        self.source_revision
    }

    /// Changes whenever a mask is generated.
    #[must_use]
    pub const fn mask_revision(&self) -> u64 {
        self.mask_revision
    }

    /// Changes whenever the stroke layer is replaced or wiped.
    ///
    /// Hosts that mirror the layer mark by mark repaint it in full when
    /// this changes.
    #[must_use]
    pub const fn layer_revision(&self) -> u64 {
        self.layer_revision
    }

    /// Whether any paint has been laid down on the current image.
    #[must_use]
    pub fn has_strokes(&self) -> bool {
        !self.surface.strokes().is_empty()
    }

    /// Whether the brush is currently down.
    #[must_use]
    pub fn is_stroking(&self) -> bool {
        self.surface.strokes().active().is_some()
    }

    /// Update the drag hover flag.
    pub const fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    /// Set the radius for subsequent strokes (clamped to the allowed
    /// range). Strokes already drawn are unaffected.
    pub fn set_brush_radius(&mut self, radius: impl Into<BrushRadius>) {
        self.surface.set_brush_radius(radius.into());
    }

    /// Set how many image pixels one on-screen pixel spans, so the brush
    /// keeps its apparent size on a scaled-down image. Applies to strokes
    /// begun afterwards.
    pub fn set_display_scale(&mut self, scale: f32) {
        self.surface.set_display_scale(scale);
    }

    /// Accept or reject an upload by MIME type and issue a ticket.
    ///
    /// Returns `None` for unsupported types without touching any state.
    /// An accepted type invalidates every previously issued ticket.
    pub fn begin_ingest(&mut self, mime: &str) -> Option<IngestTicket> {
        let Some(format) = SourceFormat::from_mime(mime) else {
            log::debug!("ignoring upload with unsupported type {mime:?}");
            return None;
        };
        self.ingest_generation += 1;
        Some(IngestTicket {
            generation: self.ingest_generation,
            format,
        })
    }

    /// Apply the result of an ingestion started with
    /// [`begin_ingest`](Self::begin_ingest).
    ///
    /// A stale ticket is dropped whatever its result. A decode failure
    /// leaves state unchanged.
    ///
    /// # Errors
    ///
    /// Returns the decode error for a current ticket, or
    /// [`MaskError::Surface`] if the surface cannot render the image.
    pub fn complete_ingest(
        &mut self,
        ticket: IngestTicket,
        decoded: Result<SourceImage, MaskError>,
    ) -> Result<IngestOutcome, MaskError> {
        if ticket.generation != self.ingest_generation {
            log::debug!(
                "dropping stale ingestion {} (current is {})",
                ticket.generation,
                self.ingest_generation
            );
            return Ok(IngestOutcome::Stale);
        }
        let source = decoded?;
        self.surface.render(&source)?;
        let dims = source.dimensions();
        log::info!(
            "loaded {} image {}x{}",
            source.format().mime(),
            dims.width,
            dims.height
        );
        self.original_file_name = format!("{ORIGINAL_FILE_STEM}.{}", source.format().extension());
        self.source = Some(source);
        self.source_revision += 1;
        self.layer_revision += 1;
        self.mask = None;
        Ok(IngestOutcome::Loaded(dims))
    }

    /// Ingest an upload synchronously.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::EmptyInput`] or [`MaskError::ImageDecode`] if
    /// an accepted upload cannot be decoded; state is then unchanged.
    pub fn ingest(&mut self, mime: &str, bytes: &[u8]) -> Result<IngestOutcome, MaskError> {
        let Some(ticket) = self.begin_ingest(mime) else {
            return Ok(IngestOutcome::Ignored);
        };
        let decoded = ingest::decode(bytes, ticket.format());
        self.complete_ingest(ticket, decoded)
    }

    /// Drop the image, strokes, and mask, and bump the input epoch.
    ///
    /// Any ingestion still in flight is invalidated too.
    pub fn reset(&mut self) {
        self.surface.end_stroke();
        self.surface.clear();
        self.source = None;
        self.mask = None;
        self.dragging = false;
        self.ingest_generation += 1;
        self.input_epoch += 1;
        self.layer_revision += 1;
        self.original_file_name.clear();
    }

    /// Erase all strokes and invalidate the mask. The image stays.
    pub fn clear_canvas(&mut self) {
        self.surface.end_stroke();
        self.surface.clear();
        self.layer_revision += 1;
        self.mask = None;
    }

    /// Put the brush down. Ignored when no image is loaded.
    ///
    /// Returns the paint laid down.
    pub fn begin_stroke(&mut self, at: Point) -> Option<BrushMark> {
        self.source.as_ref()?;
        let mark = self.surface.begin_stroke(at)?;
        self.mask = None;
        Some(mark)
    }

    /// Drag the brush. Ignored when no stroke is active.
    ///
    /// Returns the paint laid down.
    pub fn extend_stroke(&mut self, to: Point) -> Option<BrushMark> {
        self.source.as_ref()?;
        let mark = self.surface.extend_stroke(to)?;
        self.mask = None;
        Some(mark)
    }

    /// Lift the brush.
    pub fn end_stroke(&mut self) {
        self.surface.end_stroke();
    }

    /// Composite the current strokes into a fresh mask.
    ///
    /// Returns `Ok(None)` and changes nothing when no image is loaded.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::Surface`] or [`MaskError::Encode`] from the
    /// compositor.
    pub fn generate_mask(&mut self) -> Result<Option<&MaskImage>, MaskError> {
        let Some(source) = self.source.as_ref() else {
            return Ok(None);
        };
        let Some(strokes) = self.surface.raster() else {
            return Ok(None);
        };
        let mask = compositor::generate_mask(&strokes, source.dimensions())?;
        log::info!("mask generated, {} pixels masked", mask.masked_area());
        self.mask_revision += 1;
        Ok(Some(self.mask.insert(mask)))
    }

    /// The original upload, available once a mask exists.
    #[must_use]
    pub fn export_original(&self) -> Option<Download<'_>> {
        let source = self.source.as_ref()?;
        self.mask.as_ref()?;
        Some(Download {
            bytes: source.encoded(),
            file_name: &self.original_file_name,
            mime: source.format().mime(),
        })
    }

    /// The mask PNG, available once generated for a loaded image.
    #[must_use]
    pub fn export_mask(&self) -> Option<Download<'_>> {
        self.source.as_ref()?;
        let mask = self.mask.as_ref()?;
        Some(Download {
            bytes: mask.png(),
            file_name: MASK_FILE_NAME,
            mime: "image/png",
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ingest::tests::encode_solid;

    fn loaded(width: u32, height: u32) -> MaskEditor {
        let mut editor = MaskEditor::default();
        let png = encode_solid(width, height, SourceFormat::Png);
        editor.ingest("image/png", &png).unwrap();
        editor
    }

    fn scribble(editor: &mut MaskEditor) {
        editor.begin_stroke(Point::new(5.0, 5.0));
        editor.extend_stroke(Point::new(15.0, 8.0));
        editor.end_stroke();
    }

    #[test]
    fn ingest_loads_natural_dimensions_with_blank_state() {
        let mut editor = MaskEditor::default();
        let jpeg = encode_solid(33, 21, SourceFormat::Jpeg);
        let outcome = editor.ingest("image/jpeg", &jpeg).unwrap();
        assert_eq!(outcome, IngestOutcome::Loaded(Dimensions::new(33, 21)));
        assert_eq!(
            editor.source().unwrap().dimensions(),
            Dimensions::new(33, 21)
        );
        assert!(!editor.has_strokes());
        assert!(editor.mask().is_none());
    }

    #[test]
    fn unsupported_type_leaves_state_unchanged() {
        let mut editor = loaded(20, 20);
        scribble(&mut editor);
        editor.generate_mask().unwrap();
        let before = editor.mask().unwrap().pixels().clone();

        let png = encode_solid(8, 8, SourceFormat::Png);
        let outcome = editor.ingest("image/gif", &png).unwrap();

        assert_eq!(outcome, IngestOutcome::Ignored);
        assert_eq!(
            editor.source().unwrap().dimensions(),
            Dimensions::new(20, 20)
        );
        assert!(editor.has_strokes());
        assert_eq!(editor.mask().unwrap().pixels(), &before);
    }

    #[test]
    fn decode_failure_leaves_state_unchanged() {
        let mut editor = loaded(20, 20);
        scribble(&mut editor);
        let result = editor.ingest("image/png", b"not a png");
        assert!(matches!(result, Err(MaskError::ImageDecode(_))));
        assert!(editor.source().is_some());
        assert!(editor.has_strokes());
    }

    #[test]
    fn new_image_resets_strokes_and_mask() {
        let mut editor = loaded(20, 20);
        scribble(&mut editor);
        editor.generate_mask().unwrap();
        assert!(editor.mask().is_some());

        let png = encode_solid(10, 12, SourceFormat::Png);
        editor.ingest("image/png", &png).unwrap();

        assert!(editor.mask().is_none());
        assert!(!editor.has_strokes());
        assert_eq!(
            editor.surface().raster().unwrap().dimensions(),
            (10, 12)
        );
    }

    #[test]
    fn generate_mask_without_image_is_noop() {
        let mut editor = MaskEditor::default();
        editor.begin_stroke(Point::new(1.0, 1.0));
        assert!(editor.generate_mask().unwrap().is_none());
        assert!(editor.mask().is_none());
        assert!(!editor.has_strokes());
    }

    #[test]
    fn generate_mask_twice_is_identical() {
        let mut editor = loaded(24, 24);
        scribble(&mut editor);
        let first = editor.generate_mask().unwrap().unwrap().clone();
        let second = editor.generate_mask().unwrap().unwrap();
        assert_eq!(first.pixels(), second.pixels());
        assert_eq!(first.png(), second.png());
    }

    #[test]
    fn revisions_track_new_sources_and_masks() {
        let mut editor = loaded(10, 10);
        assert_eq!(editor.source_revision(), 1);
        assert_eq!(editor.mask_revision(), 0);
        editor.generate_mask().unwrap();
        editor.generate_mask().unwrap();
        assert_eq!(editor.mask_revision(), 2);
        editor.clear_canvas();
        assert_eq!(editor.source_revision(), 1);
    }

    #[test]
    fn mask_reflects_only_latest_strokes() {
        let mut editor = loaded(40, 20);
        editor.begin_stroke(Point::new(8.0, 10.0));
        editor.end_stroke();
        assert!(editor.generate_mask().unwrap().unwrap().is_masked(8, 10));

        editor.clear_canvas();
        editor.begin_stroke(Point::new(30.0, 10.0));
        editor.end_stroke();
        let mask = editor.generate_mask().unwrap().unwrap();

        assert!(!mask.is_masked(8, 10));
        assert!(mask.is_masked(30, 10));
    }

    #[test]
    fn stroke_input_invalidates_mask() {
        let mut editor = loaded(20, 20);
        editor.generate_mask().unwrap();
        assert!(editor.mask().is_some());
        editor.begin_stroke(Point::new(3.0, 3.0));
        assert!(editor.mask().is_none());
        assert!(editor.is_stroking());
        editor.end_stroke();
        assert!(!editor.is_stroking());
    }

    #[test]
    fn stroke_input_reports_marks() {
        let mut editor = loaded(40, 40);
        editor.set_brush_radius(3);
        editor.set_display_scale(2.0);
        assert_eq!(
            editor.begin_stroke(Point::new(5.0, 5.0)),
            Some(BrushMark::Dot {
                at: Point::new(5.0, 5.0),
                radius: 6.0
            })
        );
        assert_eq!(
            editor.extend_stroke(Point::new(9.0, 5.0)),
            Some(BrushMark::Segment {
                from: Point::new(5.0, 5.0),
                to: Point::new(9.0, 5.0),
                radius: 6.0
            })
        );
        editor.end_stroke();
        assert_eq!(editor.extend_stroke(Point::new(12.0, 5.0)), None);
    }

    #[test]
    fn stroke_input_without_image_reports_nothing() {
        let mut editor = MaskEditor::default();
        assert_eq!(editor.begin_stroke(Point::new(1.0, 1.0)), None);
        assert_eq!(editor.extend_stroke(Point::new(2.0, 1.0)), None);
    }

    #[test]
    fn layer_revision_changes_only_when_layer_is_wiped() {
        let mut editor = loaded(20, 20);
        let loaded_rev = editor.layer_revision();
        scribble(&mut editor);
        editor.generate_mask().unwrap();
        editor.set_brush_radius(20);
        assert_eq!(editor.layer_revision(), loaded_rev);

        editor.clear_canvas();
        let cleared_rev = editor.layer_revision();
        assert_ne!(cleared_rev, loaded_rev);

        editor.reset();
        assert_ne!(editor.layer_revision(), cleared_rev);
    }

    #[test]
    fn clear_canvas_gives_empty_mask_and_keeps_image() {
        let mut editor = loaded(20, 20);
        scribble(&mut editor);
        editor.generate_mask().unwrap();
        editor.clear_canvas();
        assert!(editor.mask().is_none());
        assert!(editor.source().is_some());

        editor.clear_canvas();
        let mask = editor.generate_mask().unwrap().unwrap();
        assert_eq!(mask.masked_area(), 0);
        assert!(mask.pixels().pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn reset_clears_everything_and_bumps_epoch() {
        let mut editor = loaded(20, 20);
        scribble(&mut editor);
        editor.generate_mask().unwrap();
        editor.set_dragging(true);
        let epoch = editor.input_epoch();

        editor.reset();

        assert!(editor.source().is_none());
        assert!(editor.mask().is_none());
        assert!(!editor.has_strokes());
        assert!(!editor.is_dragging());
        assert_eq!(editor.input_epoch(), epoch + 1);
        assert!(editor.export_original().is_none());
    }

    #[test]
    fn stale_ingestion_is_dropped() {
        let mut editor = MaskEditor::default();
        let first = editor.begin_ingest("image/png").unwrap();
        let second = editor.begin_ingest("image/png").unwrap();

        let big = encode_solid(30, 30, SourceFormat::Png);
        let small = encode_solid(10, 10, SourceFormat::Png);

        let outcome = editor
            .complete_ingest(second, ingest::decode(&small, second.format()))
            .unwrap();
        assert_eq!(outcome, IngestOutcome::Loaded(Dimensions::new(10, 10)));

        let outcome = editor
            .complete_ingest(first, ingest::decode(&big, first.format()))
            .unwrap();
        assert_eq!(outcome, IngestOutcome::Stale);
        assert_eq!(
            editor.source().unwrap().dimensions(),
            Dimensions::new(10, 10)
        );
    }

    #[test]
    fn unsupported_type_does_not_invalidate_pending_ticket() {
        let mut editor = MaskEditor::default();
        let ticket = editor.begin_ingest("image/png").unwrap();
        assert!(editor.begin_ingest("text/plain").is_none());
        let png = encode_solid(6, 6, SourceFormat::Png);
        let outcome = editor
            .complete_ingest(ticket, ingest::decode(&png, ticket.format()))
            .unwrap();
        assert!(matches!(outcome, IngestOutcome::Loaded(_)));
    }

    #[test]
    fn reset_invalidates_pending_ingestion() {
        let mut editor = MaskEditor::default();
        let ticket = editor.begin_ingest("image/png").unwrap();
        editor.reset();
        let png = encode_solid(6, 6, SourceFormat::Png);
        let outcome = editor
            .complete_ingest(ticket, ingest::decode(&png, ticket.format()))
            .unwrap();
        assert_eq!(outcome, IngestOutcome::Stale);
        assert!(editor.source().is_none());
    }

    #[test]
    fn brush_radius_defaults_and_clamps() {
        let mut editor = MaskEditor::default();
        assert_eq!(editor.brush_radius(), BrushRadius::DEFAULT);
        editor.set_brush_radius(0);
        assert_eq!(editor.brush_radius().get(), 1);
        editor.set_brush_radius(80);
        assert_eq!(editor.brush_radius().get(), 50);
    }

    #[test]
    fn exports_require_mask() {
        let mut editor = loaded(12, 12);
        assert!(editor.export_original().is_none());
        assert!(editor.export_mask().is_none());

        scribble(&mut editor);
        editor.generate_mask().unwrap();

        let original = editor.export_original().unwrap();
        assert_eq!(original.file_name, "original_image.png");
        assert_eq!(original.mime, "image/png");
        assert_eq!(original.bytes, editor.source().unwrap().encoded());

        let mask = editor.export_mask().unwrap();
        assert_eq!(mask.file_name, MASK_FILE_NAME);
        assert_eq!(mask.bytes, editor.mask().unwrap().png());
    }

    #[test]
    fn jpeg_original_keeps_jpeg_extension() {
        let mut editor = MaskEditor::default();
        let jpeg = encode_solid(12, 12, SourceFormat::Jpeg);
        editor.ingest("image/jpeg", &jpeg).unwrap();
        editor.generate_mask().unwrap();
        let original = editor.export_original().unwrap();
        assert_eq!(original.file_name, "original_image.jpg");
        assert_eq!(original.mime, "image/jpeg");
    }
}
