//! Signature pad built on tiny-skia.
//!
//! Records freehand strokes in pad-local pixel coordinates and renders them
//! onto a transparent canvas. The exported PNG is what ends up as a
//! signature annotation's payload.

use image::RgbaImage;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::decode::{encode_png, pixmap_to_rgba};
use crate::RasterError;

/// Pen settings for the signature pad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Pen width in pixels
    pub width: f32,
    /// Pen color (RGBA)
    pub color: [u8; 4],
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 2.5,
            color: [0, 0, 0, 255],
        }
    }
}

/// A freehand drawing pad that captures signature strokes.
#[derive(Debug, Clone)]
pub struct StrokePad {
    width: u32,
    height: u32,
    style: StrokeStyle,
    /// Finished and in-progress strokes, oldest first
    strokes: Vec<Vec<(f32, f32)>>,
    /// Whether the last stroke is still being drawn
    drawing: bool,
}

impl StrokePad {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_style(width, height, StrokeStyle::default())
    }

    pub fn with_style(width: u32, height: u32, style: StrokeStyle) -> Self {
        Self {
            width,
            height,
            style,
            strokes: Vec::new(),
            drawing: false,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Start a new stroke at the given pad position.
    pub fn begin_stroke(&mut self, x: f32, y: f32) {
        self.strokes.push(vec![(x, y)]);
        self.drawing = true;
    }

    /// Extend the current stroke. Ignored if no stroke is in progress.
    pub fn extend_stroke(&mut self, x: f32, y: f32) {
        if !self.drawing {
            return;
        }
        if let Some(stroke) = self.strokes.last_mut() {
            stroke.push((x, y));
        }
    }

    /// Finish the current stroke.
    pub fn end_stroke(&mut self) {
        self.drawing = false;
    }

    /// Discard all strokes.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.drawing = false;
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    /// Render all strokes onto a transparent canvas.
    pub fn render(&self) -> Result<RgbaImage, RasterError> {
        let mut pixmap = Pixmap::new(self.width, self.height).ok_or(RasterError::InvalidSize {
            width: self.width,
            height: self.height,
        })?;

        let mut paint = Paint::default();
        let [r, g, b, a] = self.style.color;
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: self.style.width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };

        for points in &self.strokes {
            match points.as_slice() {
                [] => {}
                // A tap leaves a dot
                [(x, y)] => {
                    if let Some(dot) = PathBuilder::from_circle(*x, *y, self.style.width / 2.0) {
                        pixmap.fill_path(
                            &dot,
                            &paint,
                            FillRule::Winding,
                            Transform::identity(),
                            None,
                        );
                    }
                }
                [(x0, y0), rest @ ..] => {
                    let mut pb = PathBuilder::new();
                    pb.move_to(*x0, *y0);
                    for (x, y) in rest {
                        pb.line_to(*x, *y);
                    }
                    if let Some(path) = pb.finish() {
                        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
                    }
                }
            }
        }

        Ok(pixmap_to_rgba(&pixmap))
    }

    /// Export the signature as PNG bytes, or `None` if nothing was drawn.
    pub fn export_png(&self) -> Result<Option<Vec<u8>>, RasterError> {
        if self.is_empty() {
            return Ok(None);
        }
        let img = self.render()?;
        log::debug!(
            "Exporting signature with {} strokes ({}x{})",
            self.strokes.len(),
            self.width,
            self.height
        );
        encode_png(&img).map(Some)
    }
}
