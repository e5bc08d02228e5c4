//! Document-space and screen-space geometry types.
//!
//! Document space is the unscaled coordinate system of the page, with the
//! origin at the top-left corner and y growing downward. Screen space is the
//! same system multiplied by the current zoom. The two spaces get separate
//! types so a scaled value can never be stored where an unscaled one belongs.

use serde::{Deserialize, Serialize};

// ============================================================================
// Document Space
// ============================================================================

/// A point in document (unscaled) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DocPoint {
    pub x: f32,
    pub y: f32,
}

impl DocPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Top-left position that centers a box of `size` on this point.
    pub fn centered(&self, size: DocSize) -> DocPoint {
        DocPoint::new(self.x - size.width / 2.0, self.y - size.height / 2.0)
    }
}

/// A width/height pair in document units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DocSize {
    pub width: f32,
    pub height: f32,
}

impl DocSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle in document coordinates, top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DocRect {
    /// Top-left corner X coordinate
    pub x: f32,
    /// Top-left corner Y coordinate
    pub y: f32,
    /// Width of the rectangle
    pub width: f32,
    /// Height of the rectangle
    pub height: f32,
}

impl DocRect {
    pub fn new(position: DocPoint, size: DocSize) -> Self {
        Self {
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn position(&self) -> DocPoint {
        DocPoint::new(self.x, self.y)
    }

    pub fn size(&self) -> DocSize {
        DocSize::new(self.width, self.height)
    }

    /// Check if a point is inside the rectangle. Edges count as inside.
    pub fn contains(&self, point: &DocPoint) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

// ============================================================================
// Screen Space
// ============================================================================

/// A point in screen (scaled) pixels, relative to the overlay surface origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}
