//! Document/screen coordinate mapping.
//!
//! The overlay surface shares its origin with the rendered page, so the
//! mapping is a uniform scale with no translation or rotation:
//! `screen = document * scale` and `document = screen / scale`.

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_SCALE, MIN_SCALE, SCALE_STEP};
use crate::model::{DocPoint, DocRect, DocSize, ScreenPoint, ScreenRect};

/// Allowed zoom range and slider step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleBounds {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ScaleBounds {
    /// Clamp a scale into range.
    pub fn clamp(&self, scale: f32) -> f32 {
        scale.clamp(self.min, self.max)
    }
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self {
            min: MIN_SCALE,
            max: MAX_SCALE,
            step: SCALE_STEP,
        }
    }
}

/// Uniform scale transform between document space and screen space.
///
/// The scale is assumed valid (positive, finite); use [`CoordinateTransform::clamped`]
/// when it comes from user input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    scale: f32,
}

impl CoordinateTransform {
    pub fn new(scale: f32) -> Self {
        Self { scale }
    }

    /// Create a transform with the scale clamped into `bounds`.
    pub fn clamped(scale: f32, bounds: &ScaleBounds) -> Self {
        Self::new(bounds.clamp(scale))
    }

    /// Create an identity transform (scale = 1).
    pub fn identity() -> Self {
        Self::new(1.0)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn to_screen(&self, p: DocPoint) -> ScreenPoint {
        ScreenPoint::new(p.x * self.scale, p.y * self.scale)
    }

    pub fn to_document(&self, p: ScreenPoint) -> DocPoint {
        DocPoint::new(p.x / self.scale, p.y / self.scale)
    }

    pub fn to_screen_rect(&self, r: DocRect) -> ScreenRect {
        ScreenRect::new(
            r.x * self.scale,
            r.y * self.scale,
            r.width * self.scale,
            r.height * self.scale,
        )
    }

    pub fn to_document_rect(&self, r: ScreenRect) -> DocRect {
        DocRect::new(
            DocPoint::new(r.x / self.scale, r.y / self.scale),
            DocSize::new(r.width / self.scale, r.height / self.scale),
        )
    }

    /// Pixel dimensions of a document-space size at this scale, rounded up.
    pub fn to_pixel_size(&self, size: DocSize) -> (u32, u32) {
        (
            (size.width * self.scale).ceil().max(0.0) as u32,
            (size.height * self.scale).ceil().max(0.0) as u32,
        )
    }

    /// Step the zoom up by one slider step, clamped.
    pub fn zoom_in(&self, bounds: &ScaleBounds) -> CoordinateTransform {
        Self::clamped(snap_to_step(self.scale + bounds.step, bounds.step), bounds)
    }

    /// Step the zoom down by one slider step, clamped.
    pub fn zoom_out(&self, bounds: &ScaleBounds) -> CoordinateTransform {
        Self::clamped(snap_to_step(self.scale - bounds.step, bounds.step), bounds)
    }
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Round to the nearest multiple of `step` so repeated stepping does not drift.
fn snap_to_step(value: f32, step: f32) -> f32 {
    if step <= 0.0 {
        return value;
    }
    (value / step).round() * step
}
