//! Renderer tests covering both decode modes.

use docstamp_raster::{RgbaImage, encode_png};
use image::Rgba;

use super::{DecodeMode, OverlayRenderer};
use crate::collaborators::{EcLevel, QrGenerator, SvgQrGenerator};
use crate::model::{Annotation, AnnotationKind, DocPoint, DocSize, Payload};
use crate::transform::CoordinateTransform;

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];
const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

fn solid_payload(color: [u8; 4]) -> Payload {
    let img = RgbaImage::from_pixel(4, 4, Rgba(color));
    Payload::raster(encode_png(&img).expect("encode"))
}

fn element(id: u64, x: f32, y: f32, color: [u8; 4]) -> Annotation {
    Annotation {
        id,
        kind: AnnotationKind::Signature,
        position: DocPoint::new(x, y),
        size: DocSize::new(40.0, 20.0),
        payload: solid_payload(color),
    }
}

fn pixel(renderer: &OverlayRenderer, x: u32, y: u32) -> Rgba<u8> {
    *renderer.surface().pixels().get_pixel(x, y)
}

#[test]
fn test_draws_at_scaled_rect() {
    let mut renderer = OverlayRenderer::new(DecodeMode::Inline);
    let elements = vec![element(1, 10.0, 10.0, RED)];

    renderer.redraw(&elements, CoordinateTransform::new(2.0), (200, 200));

    assert_eq!(renderer.surface().dimensions(), (200, 200));
    // Screen rect is (20, 20) 80x40
    assert_eq!(pixel(&renderer, 25, 25), Rgba(RED));
    assert_eq!(pixel(&renderer, 95, 55), Rgba(RED));
    assert_eq!(pixel(&renderer, 15, 15), CLEAR);
    assert_eq!(pixel(&renderer, 105, 25), CLEAR);
    assert_eq!(renderer.stats().drawn, 1);
}

#[test]
fn test_redraw_is_idempotent() {
    let mut renderer = OverlayRenderer::new(DecodeMode::Inline);
    let elements = vec![element(1, 0.0, 0.0, RED), element(2, 20.0, 5.0, BLUE)];
    let t = CoordinateTransform::new(1.3);

    renderer.redraw(&elements, t, (120, 80));
    let first = renderer.surface().clone();
    renderer.redraw(&elements, t, (120, 80));

    assert_eq!(renderer.surface(), &first);
    assert_eq!(renderer.generation(), 2);
}

#[test]
fn test_moved_element_leaves_no_trace() {
    let mut renderer = OverlayRenderer::new(DecodeMode::Inline);
    let mut elements = vec![element(1, 0.0, 0.0, RED)];
    let t = CoordinateTransform::identity();

    renderer.redraw(&elements, t, (100, 100));
    assert_eq!(pixel(&renderer, 5, 5), Rgba(RED));

    elements[0].position = DocPoint::new(50.0, 50.0);
    renderer.redraw(&elements, t, (100, 100));
    assert_eq!(pixel(&renderer, 5, 5), CLEAR);
    assert_eq!(pixel(&renderer, 55, 55), Rgba(RED));
}

#[test]
fn test_later_element_painted_on_top() {
    let mut renderer = OverlayRenderer::new(DecodeMode::Inline);
    let elements = vec![element(1, 0.0, 0.0, RED), element(2, 10.0, 0.0, BLUE)];

    renderer.redraw(&elements, CoordinateTransform::identity(), (100, 100));
    assert_eq!(pixel(&renderer, 5, 5), Rgba(RED));
    assert_eq!(pixel(&renderer, 15, 5), Rgba(BLUE));
}

#[test]
fn test_undecodable_payload_is_skipped() {
    let mut renderer = OverlayRenderer::new(DecodeMode::Inline);
    let mut broken = element(1, 0.0, 0.0, RED);
    broken.payload = Payload::raster(b"not a png".to_vec());
    let elements = vec![broken, element(2, 50.0, 50.0, BLUE)];
    let t = CoordinateTransform::identity();

    renderer.redraw(&elements, t, (100, 100));
    assert_eq!(pixel(&renderer, 5, 5), CLEAR);
    assert_eq!(pixel(&renderer, 55, 55), Rgba(BLUE));
    assert_eq!(renderer.stats().failed, 1);

    // Not retried on the next redraw
    renderer.redraw(&elements, t, (100, 100));
    assert_eq!(renderer.stats().failed, 1);
}

#[test]
fn test_background_matches_inline() {
    let elements = vec![element(1, 0.0, 0.0, RED), element(2, 10.0, 0.0, BLUE)];
    let t = CoordinateTransform::new(1.5);

    let mut inline = OverlayRenderer::new(DecodeMode::Inline);
    inline.redraw(&elements, t, (150, 150));

    let mut background = OverlayRenderer::new(DecodeMode::Background);
    assert_eq!(background.mode(), DecodeMode::Background);
    background.redraw(&elements, t, (150, 150));
    assert_eq!(background.stats().awaiting, 2);

    background.wait_for_decodes();
    assert_eq!(background.pending_decodes(), 0);
    assert_eq!(background.stats().awaiting, 0);
    assert_eq!(background.surface(), inline.surface());

    // Second redraw is served from cache without waiting
    background.redraw(&elements, t, (150, 150));
    assert_eq!(background.stats().drawn, 2);
    assert_eq!(background.surface(), inline.surface());
}

#[test]
fn test_completion_for_removed_element_is_discarded() {
    let mut renderer = OverlayRenderer::new(DecodeMode::Background);
    let t = CoordinateTransform::identity();

    renderer.redraw(&[element(1, 0.0, 0.0, RED)], t, (100, 100));
    // Element removed before its decode finished
    renderer.redraw(&[], t, (100, 100));
    renderer.wait_for_decodes();

    assert_eq!(renderer.stats().stale_discarded, 1);
    assert!(renderer.surface().is_blank());
}

#[test]
fn test_completion_lands_at_latest_position() {
    let mut renderer = OverlayRenderer::new(DecodeMode::Background);
    let t = CoordinateTransform::identity();
    let mut elements = vec![element(1, 0.0, 0.0, RED)];

    renderer.redraw(&elements, t, (100, 100));
    elements[0].position = DocPoint::new(50.0, 50.0);
    renderer.redraw(&elements, t, (100, 100));
    renderer.wait_for_decodes();

    assert_eq!(pixel(&renderer, 5, 5), CLEAR);
    assert_eq!(pixel(&renderer, 55, 55), Rgba(RED));
    assert_eq!(renderer.stats().stale_discarded, 0);
}

#[test]
fn test_surface_follows_requested_size() {
    let mut renderer = OverlayRenderer::new(DecodeMode::Inline);
    renderer.redraw(&[], CoordinateTransform::identity(), (612, 792));
    assert_eq!(renderer.surface().dimensions(), (612, 792));
    renderer.redraw(&[], CoordinateTransform::new(0.5), (306, 396));
    assert_eq!(renderer.surface().dimensions(), (306, 396));
}

fn qr_element(id: u64) -> Annotation {
    let payload = SvgQrGenerator::new()
        .generate("https://example.com", 100, EcLevel::L)
        .expect("generate");
    Annotation {
        id,
        kind: AnnotationKind::QrCode,
        position: DocPoint::new(0.0, 0.0),
        size: DocSize::new(100.0, 100.0),
        payload,
    }
}

/// Pixels in the top-left `size` x `size` square that are not opaque black or white.
fn grey_pixels(renderer: &OverlayRenderer, size: u32) -> usize {
    let black = Rgba([0, 0, 0, 255]);
    let white = Rgba([255, 255, 255, 255]);
    (0..size)
        .flat_map(|y| (0..size).map(move |x| (x, y)))
        .filter(|&(x, y)| {
            let px = pixel(renderer, x, y);
            px != black && px != white
        })
        .count()
}

#[test]
fn test_svg_stays_sharp_when_zoomed() {
    let mut renderer = OverlayRenderer::new(DecodeMode::Inline);
    let elements = vec![qr_element(1)];

    renderer.redraw(&elements, CoordinateTransform::identity(), (100, 100));
    assert_eq!(grey_pixels(&renderer, 100), 0);

    // Cached 100px raster must not be stretched to 200px
    renderer.redraw(&elements, CoordinateTransform::new(2.0), (200, 200));
    assert_eq!(renderer.stats().drawn, 1);
    assert_eq!(grey_pixels(&renderer, 200), 0);
}

#[test]
fn test_svg_resized_while_decoding_in_background() {
    let mut renderer = OverlayRenderer::new(DecodeMode::Background);
    let elements = vec![qr_element(1)];

    renderer.redraw(&elements, CoordinateTransform::identity(), (100, 100));
    renderer.redraw(&elements, CoordinateTransform::new(2.0), (200, 200));
    renderer.wait_for_decodes();

    assert_eq!(renderer.stats().drawn, 1);
    assert_eq!(renderer.stats().awaiting, 0);
    assert_eq!(grey_pixels(&renderer, 200), 0);
}

#[test]
fn test_dead_decoder_falls_back_to_inline() {
    let mut renderer = OverlayRenderer::new(DecodeMode::Background);
    let t = CoordinateTransform::identity();
    renderer
        .decoder_mut()
        .expect("decoder thread")
        .shutdown();

    let elements = vec![element(1, 0.0, 0.0, RED), element(2, 50.0, 50.0, BLUE)];
    renderer.redraw(&elements, t, (100, 100));

    assert_eq!(renderer.mode(), DecodeMode::Inline);
    assert_eq!(renderer.stats().awaiting, 0);
    assert_eq!(renderer.stats().drawn, 2);
    assert_eq!(pixel(&renderer, 5, 5), Rgba(RED));
    assert_eq!(pixel(&renderer, 55, 55), Rgba(BLUE));
}

#[test]
fn test_decoder_dying_between_redraws() {
    let mut renderer = OverlayRenderer::new(DecodeMode::Background);
    let t = CoordinateTransform::identity();
    let elements = vec![element(1, 0.0, 0.0, RED)];

    renderer.redraw(&elements, t, (100, 100));
    renderer.wait_for_decodes();
    // Thread gone with nothing in flight; the next element must still be drawn
    renderer
        .decoder_mut()
        .expect("decoder thread")
        .shutdown();
    let elements = vec![element(1, 0.0, 0.0, RED), element(2, 50.0, 50.0, BLUE)];
    renderer.redraw(&elements, t, (100, 100));
    renderer.pump();

    assert_eq!(renderer.mode(), DecodeMode::Inline);
    assert_eq!(pixel(&renderer, 55, 55), Rgba(BLUE));
}
