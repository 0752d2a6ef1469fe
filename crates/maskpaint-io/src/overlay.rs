//! The stroke overlay canvas.
//!
//! The overlay is a `<canvas>` stacked over the source `<img>`. Its
//! backing store has the source image's natural size while CSS scales it
//! to the displayed size, so pointer positions must be mapped from CSS
//! pixels back to image pixels before they reach the editor.
//!
//! Pointer input is mirrored mark by mark with [`paint_mark`]; the whole
//! stroke raster is copied in with [`repaint`] only when the layer is
//! replaced or wiped.

use std::f64::consts::TAU;

use maskpaint_core::{BrushMark, Dimensions, Point, RgbaImage};
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const BRUSH_COLOR: &str = "#ffffff";

/// Errors from overlay canvas access.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    /// The overlay element is missing from the document.
    #[error("overlay canvas #{0} not found")]
    NotFound(String),

    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for OverlayError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Where an element sits on screen, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedRect {
    pub left: f64,
    pub top: f64,
    /// Displayed width.
    pub width: f64,
    /// Displayed height.
    pub height: f64,
}

/// Map a client-space position onto the image's pixel grid.
///
/// Returns `None` if the element has no rendered area.
#[must_use]
pub fn to_image_point(
    client_x: f64,
    client_y: f64,
    rect: RenderedRect,
    natural: Dimensions,
) -> Option<Point> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }
    let x = (client_x - rect.left) * f64::from(natural.width) / rect.width;
    let y = (client_y - rect.top) * f64::from(natural.height) / rect.height;
    #[allow(clippy::cast_possible_truncation)]
    Some(Point::new(x as f32, y as f32))
}

/// Image pixels per CSS pixel along the horizontal axis.
///
/// Returns `None` if the element has no rendered width.
#[must_use]
pub fn display_scale(rect: RenderedRect, natural: Dimensions) -> Option<f32> {
    if rect.width <= 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    Some((f64::from(natural.width) / rect.width) as f32)
}

/// Look up the overlay canvas by element id.
///
/// # Errors
///
/// Returns [`OverlayError::NotFound`] if no such canvas exists.
pub fn canvas(id: &str) -> Result<HtmlCanvasElement, OverlayError> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        .ok_or_else(|| OverlayError::NotFound(id.to_owned()))
}

/// The overlay's on-screen rectangle.
///
/// # Errors
///
/// Returns [`OverlayError::NotFound`] if the canvas is missing.
pub fn rendered_rect(id: &str) -> Result<RenderedRect, OverlayError> {
    let rect = canvas(id)?.get_bounding_client_rect();
    Ok(RenderedRect {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    })
}

fn context(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, OverlayError> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| OverlayError::JsError("no 2d context".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|e| OverlayError::JsError(format!("failed to cast context: {e:?}")))
}

/// Replace the overlay's contents with `strokes`, resizing the backing
/// store to match.
///
/// # Errors
///
/// Returns [`OverlayError`] if the canvas or its 2D context is
/// unavailable, or `putImageData` fails.
pub fn repaint(id: &str, strokes: &RgbaImage) -> Result<(), OverlayError> {
    let canvas = canvas(id)?;
    if canvas.width() != strokes.width() {
        canvas.set_width(strokes.width());
    }
    if canvas.height() != strokes.height() {
        canvas.set_height(strokes.height());
    }
    let ctx = context(&canvas)?;

    let data = web_sys::ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(strokes.as_raw().as_slice()),
        strokes.width(),
        strokes.height(),
    )?;
    ctx.put_image_data(&data, 0.0, 0.0)?;
    Ok(())
}

/// Draw one brush mark onto the overlay, matching the stroke layer's
/// white round-capped rendering.
///
/// # Errors
///
/// Returns [`OverlayError`] if the canvas or its 2D context is
/// unavailable.
pub fn paint_mark(id: &str, mark: BrushMark) -> Result<(), OverlayError> {
    let ctx = context(&canvas(id)?)?;
    ctx.set_fill_style_str(BRUSH_COLOR);
    ctx.set_stroke_style_str(BRUSH_COLOR);
    ctx.begin_path();
    match mark {
        BrushMark::Dot { at, radius } => {
            ctx.arc(f64::from(at.x), f64::from(at.y), f64::from(radius), 0.0, TAU)?;
            ctx.fill();
        }
        BrushMark::Segment { from, to, radius } => {
            ctx.set_line_width(f64::from(radius) * 2.0);
            ctx.set_line_cap("round");
            ctx.set_line_join("round");
            ctx.move_to(f64::from(from.x), f64::from(from.y));
            ctx.line_to(f64::from(to.x), f64::from(to.y));
            ctx.stroke();
        }
    }
    Ok(())
}
