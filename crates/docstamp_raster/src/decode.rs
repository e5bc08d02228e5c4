//! Payload decoding and encoding.
//!
//! Raster payloads are decoded with the `image` crate. Vector payloads (SVG
//! markup, as produced by QR generators) are rasterized with resvg/tiny-skia
//! and converted from premultiplied to straight alpha so they blend the same
//! way as decoded raster images.

use std::io::Cursor;

use image::RgbaImage;

use crate::RasterError;

/// Decode encoded image bytes (PNG, JPEG) into RGBA pixels.
pub fn decode_raster(bytes: &[u8]) -> Result<RgbaImage, RasterError> {
    if bytes.is_empty() {
        return Err(RasterError::Empty);
    }
    let img = image::load_from_memory(bytes)?.to_rgba8();
    log::debug!("Decoded raster payload: {}x{}", img.width(), img.height());
    Ok(img)
}

/// Rasterize SVG markup into RGBA pixels.
///
/// With `size` set, the SVG is stretched to exactly `width` x `height`
/// pixels; otherwise the document's intrinsic size is used.
pub fn rasterize_svg(markup: &str, size: Option<(u32, u32)>) -> Result<RgbaImage, RasterError> {
    if markup.trim().is_empty() {
        return Err(RasterError::Empty);
    }

    let tree = resvg::usvg::Tree::from_str(markup, &resvg::usvg::Options::default())?;

    let svg_size = tree.size();
    let (width, height) = size.unwrap_or_else(|| {
        (
            svg_size.width().ceil() as u32,
            svg_size.height().ceil() as u32,
        )
    });

    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(RasterError::InvalidSize { width, height })?;

    let transform = tiny_skia::Transform::from_scale(
        width as f32 / svg_size.width(),
        height as f32 / svg_size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    log::debug!(
        "Rasterized SVG payload: {:?} -> {}x{}",
        svg_size,
        width,
        height
    );

    Ok(pixmap_to_rgba(&pixmap))
}

/// Convert a tiny-skia pixmap (premultiplied alpha) to straight-alpha RGBA.
pub(crate) fn pixmap_to_rgba(pixmap: &tiny_skia::Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

/// Encode RGBA pixels as PNG bytes.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, RasterError> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(bytes)
}
