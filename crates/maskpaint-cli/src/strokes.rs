//! Stroke files: the JSON form of a painting session.
//!
//! Same shape as a serialized `StrokeLayer`, except the radius may be
//! left out per stroke and is then filled from the command line. The
//! optional `scale` (image pixels per on-screen pixel) defaults to 1.
//!
//! ```json
//! { "strokes": [ { "radius": 12, "points": [ { "x": 10.0, "y": 20.5 } ] } ] }
//! ```

use maskpaint_core::{BrushRadius, MaskEditor, Point};
use serde::Deserialize;

/// A parsed stroke file.
#[derive(Debug, Deserialize)]
pub struct StrokeFile {
    pub strokes: Vec<StrokeSpec>,
}

/// One stroke as written in the file.
#[derive(Debug, Deserialize)]
pub struct StrokeSpec {
    #[serde(default)]
    pub radius: Option<u32>,
    #[serde(default)]
    pub scale: Option<f32>,
    pub points: Vec<Point>,
}

impl StrokeFile {
    /// Parse a stroke file.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed input.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Paint every stroke onto `editor`, in file order.
    ///
    /// Strokes without points are skipped. Returns the number painted.
    pub fn replay(&self, editor: &mut MaskEditor, default_radius: BrushRadius) -> usize {
        let mut painted = 0;
        for stroke in &self.strokes {
            let Some((&first, rest)) = stroke.points.split_first() else {
                log::debug!("skipping stroke without points");
                continue;
            };
            editor.set_brush_radius(stroke.radius.map_or(default_radius, BrushRadius::new));
            editor.set_display_scale(stroke.scale.unwrap_or(1.0));
            editor.begin_stroke(first);
            for &p in rest {
                editor.extend_stroke(p);
            }
            editor.end_stroke();
            painted += 1;
        }
        painted
    }
}
