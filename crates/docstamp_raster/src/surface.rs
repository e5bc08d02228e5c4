//! RGBA overlay surface.
//!
//! The surface is a transparent layer sized to the rendered page. Annotation
//! images are scaled into their screen rectangles and alpha-blended on top of
//! whatever is already there, so later draws end up visually on top.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// A transparent RGBA drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pixels: RgbaImage,
}

impl Surface {
    /// Create a cleared surface of the given pixel dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, TRANSPARENT),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Resize the surface. Contents are discarded when the size changes.
    ///
    /// Returns `true` if the dimensions actually changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if self.dimensions() == (width, height) {
            return false;
        }
        log::debug!(
            "Resizing overlay surface {:?} -> {}x{}",
            self.dimensions(),
            width,
            height
        );
        self.pixels = RgbaImage::from_pixel(width, height, TRANSPARENT);
        true
    }

    /// Reset every pixel to fully transparent.
    pub fn clear(&mut self) {
        for px in self.pixels.pixels_mut() {
            *px = TRANSPARENT;
        }
    }

    /// Draw `image` scaled into the rectangle at (`x`, `y`) of size
    /// `width` x `height` (screen pixels). Parts outside the surface are clipped.
    pub fn draw_image(&mut self, image: &RgbaImage, x: f32, y: f32, width: f32, height: f32) {
        let target_w = width.round().max(0.0) as u32;
        let target_h = height.round().max(0.0) as u32;
        if target_w == 0 || target_h == 0 || image.width() == 0 || image.height() == 0 {
            return;
        }

        let left = x.round() as i64;
        let top = y.round() as i64;

        if image.dimensions() == (target_w, target_h) {
            imageops::overlay(&mut self.pixels, image, left, top);
        } else {
            let scaled = imageops::resize(image, target_w, target_h, FilterType::Triangle);
            imageops::overlay(&mut self.pixels, &scaled, left, top);
        }
    }

    /// Blend this surface over `page` at the origin.
    pub fn composite_onto(&self, page: &mut RgbaImage) {
        imageops::overlay(page, &self.pixels, 0, 0);
    }

    /// Borrow the underlying pixel buffer.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Whether every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixels.pixels().all(|p| p[3] == 0)
    }
}
