//! Freehand strokes and the stroke layer that accumulates them.

use serde::{Deserialize, Serialize};

use crate::types::{BrushRadius, Point};

const fn unit_scale() -> f32 {
    1.0
}

/// Replace a non-positive or non-finite display scale with `1.0`.
#[must_use]
pub fn sanitize_scale(scale: f32) -> f32 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

/// One freehand stroke: the points a pointer passed through while held
/// down, and the brush in effect when it went down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Brush radius captured at the start of the stroke.
    #[serde(default)]
    pub radius: BrushRadius,
    /// Image pixels per on-screen pixel when the stroke began.
    #[serde(default = "unit_scale")]
    pub scale: f32,
    /// Points in drawing order, in source-image pixel coordinates.
    pub points: Vec<Point>,
}

impl Stroke {
    /// Start a stroke at `start`.
    #[must_use]
    pub fn new(start: Point, radius: BrushRadius, scale: f32) -> Self {
        Self {
            radius,
            scale: sanitize_scale(scale),
            points: vec![start],
        }
    }

    /// Brush radius in image pixels.
    #[must_use]
    pub fn pixel_radius(&self) -> f32 {
        self.radius.scaled(sanitize_scale(self.scale))
    }

    /// The most recent point, if any.
    #[must_use]
    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }
}

/// Paint laid down by one stroke input, in image pixels.
///
/// Lets a host mirror the stroke layer piecewise instead of copying the
/// whole raster after every pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrushMark {
    /// A filled disc where the brush went down.
    Dot { at: Point, radius: f32 },
    /// A round-capped segment the brush was dragged along.
    Segment { from: Point, to: Point, radius: f32 },
}

/// Accumulated paint state of the drawing surface.
///
/// Holds completed strokes plus at most one stroke in progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeLayer {
    strokes: Vec<Stroke>,
    #[serde(skip)]
    active: Option<Stroke>,
}

impl StrokeLayer {
    /// Create an empty layer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            strokes: Vec::new(),
            active: None,
        }
    }

    /// Whether no paint has been laid down, including any active stroke.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.active.is_none()
    }

    /// Completed strokes in drawing order.
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// The stroke currently being drawn.
    #[must_use]
    pub const fn active(&self) -> Option<&Stroke> {
        self.active.as_ref()
    }

    /// Begin a stroke. An unfinished stroke is committed first.
    ///
    /// Returns the dot the brush leaves where it went down.
    pub fn begin(&mut self, start: Point, radius: BrushRadius, scale: f32) -> BrushMark {
        self.end();
        let stroke = Stroke::new(start, radius, scale);
        let mark = BrushMark::Dot {
            at: start,
            radius: stroke.pixel_radius(),
        };
        self.active = Some(stroke);
        mark
    }

    /// Append a point to the active stroke.
    ///
    /// Returns the segment from the previous point, or `None` when no
    /// stroke is active.
    pub fn extend(&mut self, point: Point) -> Option<BrushMark> {
        let stroke = self.active.as_mut()?;
        let from = stroke.last()?;
        stroke.points.push(point);
        Some(BrushMark::Segment {
            from,
            to: point,
            radius: stroke.pixel_radius(),
        })
    }

    /// Commit the active stroke, if any.
    pub fn end(&mut self) {
        if let Some(stroke) = self.active.take() {
            self.strokes.push(stroke);
        }
    }

    /// Remove all strokes.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.active = None;
    }

    /// All strokes including the active one, in drawing order.
    pub fn iter(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter().chain(self.active.as_ref())
    }
}
