//! docstamp_raster - pixel layer for the docstamp overlay
//!
//! This crate owns everything that touches actual pixels: the RGBA overlay
//! surface, decoding of annotation payloads (encoded raster images and SVG
//! markup) and the stroke-based signature pad.

mod decode;
mod error;
mod pad;
mod surface;

pub use decode::{decode_raster, encode_png, rasterize_svg};
pub use error::RasterError;
pub use pad::{StrokePad, StrokeStyle};
pub use surface::Surface;

// Re-export the image buffer type callers exchange with this crate
pub use image::RgbaImage;
