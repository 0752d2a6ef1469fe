//! The drawing surface: background bitmap plus a freehand stroke layer.
//!
//! [`DrawingSurface`] is the seam between the editor and whatever paints
//! strokes. [`PixmapSurface`] is the built-in implementation, rasterising
//! strokes with `tiny-skia` onto a transparent layer the size of the
//! source image.

use tiny_skia::{
    Color, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke as SkStroke, Transform,
};

use crate::compositor::pixmap_to_rgba;
use crate::stroke::{BrushMark, StrokeLayer, sanitize_scale};
use crate::types::{BrushRadius, Dimensions, MaskError, Point, RgbaImage, SourceImage};

/// Capabilities the editor needs from a stroke-capturing surface.
pub trait DrawingSurface {
    /// Show `image` as the background and size the stroke layer to it.
    ///
    /// Any existing strokes are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::Surface`] if the layer cannot be allocated.
    fn render(&mut self, image: &SourceImage) -> Result<(), MaskError>;

    /// Remove all strokes, keeping the background.
    fn clear(&mut self);

    /// The current stroke layer as straight-alpha RGBA, or `None` before
    /// anything has been rendered.
    ///
    /// Painted pixels are white; unpainted pixels are fully transparent.
    fn raster(&self) -> Option<RgbaImage>;

    /// Radius used for strokes begun from now on.
    fn set_brush_radius(&mut self, radius: BrushRadius);

    /// The radius the next stroke will use.
    fn brush_radius(&self) -> BrushRadius;

    /// Image pixels per on-screen pixel, applied to strokes begun from
    /// now on. Non-positive or non-finite values mean `1.0`.
    fn set_display_scale(&mut self, scale: f32);

    /// The display scale the next stroke will use.
    fn display_scale(&self) -> f32;

    /// Put the brush down at `at`. Returns `None` if nothing was painted.
    fn begin_stroke(&mut self, at: Point) -> Option<BrushMark>;

    /// Drag the brush to `to`. Returns `None` if no stroke is active.
    fn extend_stroke(&mut self, to: Point) -> Option<BrushMark>;

    /// Lift the brush.
    fn end_stroke(&mut self);

    /// The accumulated strokes.
    fn strokes(&self) -> &StrokeLayer;
}

/// A [`DrawingSurface`] backed by a `tiny-skia` pixmap.
///
/// Strokes are white, anti-aliased, with round caps and joins, and are
/// painted incrementally as points arrive.
#[derive(Debug)]
pub struct PixmapSurface {
    layer: Option<Pixmap>,
    strokes: StrokeLayer,
    radius: BrushRadius,
    scale: f32,
}

impl Default for PixmapSurface {
    fn default() -> Self {
        Self {
            layer: None,
            strokes: StrokeLayer::new(),
            radius: BrushRadius::DEFAULT,
            scale: 1.0,
        }
    }
}

impl PixmapSurface {
    /// Create a surface with nothing rendered yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dimensions of the stroke layer, once rendered.
    #[must_use]
    pub fn dimensions(&self) -> Option<Dimensions> {
        self.layer
            .as_ref()
            .map(|p| Dimensions::new(p.width(), p.height()))
    }

    fn paint(&mut self, mark: BrushMark) {
        let Some(layer) = self.layer.as_mut() else {
            return;
        };
        match mark {
            BrushMark::Dot { at, radius } => {
                let Some(path) = PathBuilder::from_circle(at.x, at.y, radius) else {
                    return;
                };
                layer.fill_path(
                    &path,
                    &brush_paint(),
                    FillRule::Winding,
                    Transform::identity(),
                    None,
                );
            }
            BrushMark::Segment { from, to, radius } => {
                let mut pb = PathBuilder::new();
                pb.move_to(from.x, from.y);
                pb.line_to(to.x, to.y);
                let Some(path) = pb.finish() else {
                    return;
                };
                let stroke = SkStroke {
                    width: radius * 2.0,
                    line_cap: LineCap::Round,
                    line_join: LineJoin::Round,
                    ..SkStroke::default()
                };
                layer.stroke_path(&path, &brush_paint(), &stroke, Transform::identity(), None);
            }
        }
    }
}

impl DrawingSurface for PixmapSurface {
    fn render(&mut self, image: &SourceImage) -> Result<(), MaskError> {
        let dims = image.dimensions();
        let layer = Pixmap::new(dims.width, dims.height).ok_or_else(|| {
            MaskError::Surface(format!(
                "cannot allocate {}x{} stroke layer",
                dims.width, dims.height
            ))
        })?;
        self.layer = Some(layer);
        self.strokes.clear();
        Ok(())
    }

    fn clear(&mut self) {
        self.strokes.clear();
        if let Some(layer) = self.layer.as_mut() {
            layer.fill(Color::TRANSPARENT);
        }
    }

    fn raster(&self) -> Option<RgbaImage> {
        self.layer.as_ref().map(pixmap_to_rgba)
    }

    fn set_brush_radius(&mut self, radius: BrushRadius) {
        self.radius = radius;
    }

    fn brush_radius(&self) -> BrushRadius {
        self.radius
    }

    fn set_display_scale(&mut self, scale: f32) {
        self.scale = sanitize_scale(scale);
    }

    fn display_scale(&self) -> f32 {
        self.scale
    }

    fn begin_stroke(&mut self, at: Point) -> Option<BrushMark> {
        self.layer.as_ref()?;
        let mark = self.strokes.begin(at, self.radius, self.scale);
        self.paint(mark);
        Some(mark)
    }

    fn extend_stroke(&mut self, to: Point) -> Option<BrushMark> {
        let mark = self.strokes.extend(to)?;
        self.paint(mark);
        Some(mark)
    }

    fn end_stroke(&mut self) {
        self.strokes.end();
    }

    fn strokes(&self) -> &StrokeLayer {
        &self.strokes
    }
}

/// Opaque white, anti-aliased.
fn brush_paint() -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(255, 255, 255, 255);
    paint.anti_alias = true;
    paint
}
