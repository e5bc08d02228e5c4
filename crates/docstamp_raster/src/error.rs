//! Error types for raster operations.

use thiserror::Error;

/// Errors that can occur while decoding, rasterizing or encoding pixels.
#[derive(Error, Debug)]
pub enum RasterError {
    /// Encoded image bytes could not be decoded
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// SVG markup could not be parsed
    #[error("Failed to parse SVG: {0}")]
    Svg(#[from] resvg::usvg::Error),

    /// A pixmap of the requested size could not be allocated
    #[error("Invalid pixmap size {width}x{height}")]
    InvalidSize {
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
    },

    /// Payload was empty
    #[error("Empty payload")]
    Empty,
}
