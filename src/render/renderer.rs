//! Overlay renderer.
//!
//! Draws every annotation's payload into its screen rectangle on a
//! transparent surface sized like the rendered page. Each call to
//! [`OverlayRenderer::redraw`] starts a new generation: the surface is
//! cleared and rebuilt from scratch, so removed or moved elements never
//! leave stale pixels behind.
//!
//! Decoded payloads are cached per annotation. SVG payloads are rasterized at
//! the pixel size of their screen rectangle and re-rasterized when that size
//! changes; raster payloads are decoded once and scaled when drawn. Payloads
//! not in the cache are decoded either inline or on the background decoder
//! thread. A background completion is only drawn if its annotation is still
//! awaiting pixels of that size in the current generation; anything else is
//! counted as stale and skipped. When a completion is drawn, the frame is
//! recomposed in paint order so stacking does not depend on the order in
//! which decodes finish. If the decoder thread dies, the renderer switches to
//! inline decoding.

use std::collections::{HashMap, HashSet};

use docstamp_raster::{RgbaImage, Surface};
use serde::{Deserialize, Serialize};

use super::decoder::{DecodeCompletion, DecodeTarget, DecoderThread, decode_payload};
use crate::model::{Annotation, AnnotationId, AnnotationKind, Payload, ScreenRect};
use crate::transform::CoordinateTransform;

/// Where payload decoding happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// Decode during `redraw` on the calling thread
    #[default]
    Inline,
    /// Decode on a background thread; completions are applied by `pump`
    Background,
}

/// Counters describing the renderer's work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Current generation
    pub generation: u64,
    /// Elements drawn in the current generation
    pub drawn: usize,
    /// Elements of the current generation still waiting for pixels
    pub awaiting: usize,
    /// Completions discarded because their generation had moved on (total)
    pub stale_discarded: usize,
    /// Payloads that failed to decode (total)
    pub failed: usize,
}

/// Decoded pixels and the size they were produced for.
struct CachedImage {
    image: RgbaImage,
    target: DecodeTarget,
}

/// One element of the current frame.
#[derive(Clone)]
struct FrameEntry {
    id: AnnotationId,
    kind: AnnotationKind,
    rect: ScreenRect,
    target: DecodeTarget,
    payload: Payload,
}

impl FrameEntry {
    fn new(element: &Annotation, transform: CoordinateTransform) -> Self {
        let rect = transform.to_screen_rect(element.bounds());
        let target = match element.payload {
            Payload::Raster(_) => None,
            // Same rounding as Surface::draw_image, so no resampling happens
            Payload::Svg(_) => Some((
                rect.width.round().max(0.0) as u32,
                rect.height.round().max(0.0) as u32,
            )),
        };
        Self {
            id: element.id,
            kind: element.kind,
            rect,
            target,
            payload: element.payload.clone(),
        }
    }

    /// Nothing to decode for an element that covers no pixels.
    fn is_empty(&self) -> bool {
        matches!(self.target, Some((0, _)) | Some((_, 0)))
    }
}

/// Redraws annotations onto the overlay surface.
pub struct OverlayRenderer {
    surface: Surface,
    mode: DecodeMode,
    decoder: Option<DecoderThread>,
    /// Decoded payloads keyed by annotation
    cache: HashMap<AnnotationId, CachedImage>,
    /// Paint order and rectangles of the current generation
    frame: Vec<FrameEntry>,
    /// Elements of the current generation whose pixels are not drawn yet
    awaiting: HashSet<AnnotationId>,
    /// Annotations whose payload could not be decoded; not retried
    broken: HashSet<AnnotationId>,
    generation: u64,
    stats: RenderStats,
}

impl OverlayRenderer {
    /// Create a renderer. Falls back to inline decoding if the decoder thread
    /// cannot be started.
    pub fn new(mode: DecodeMode) -> Self {
        let (mode, decoder) = match mode {
            DecodeMode::Inline => (DecodeMode::Inline, None),
            DecodeMode::Background => match DecoderThread::spawn() {
                Ok(thread) => (DecodeMode::Background, Some(thread)),
                Err(e) => {
                    log::warn!("Failed to spawn decoder thread ({}), decoding inline", e);
                    (DecodeMode::Inline, None)
                }
            },
        };

        Self {
            surface: Surface::new(0, 0),
            mode,
            decoder,
            cache: HashMap::new(),
            frame: Vec::new(),
            awaiting: HashSet::new(),
            broken: HashSet::new(),
            generation: 0,
            stats: RenderStats::default(),
        }
    }

    pub fn mode(&self) -> DecodeMode {
        self.mode
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Number of decodes still in flight on the background thread.
    pub fn pending_decodes(&self) -> usize {
        self.decoder.as_ref().map_or(0, |d| d.pending_count())
    }

    #[cfg(test)]
    pub(super) fn decoder_mut(&mut self) -> Option<&mut DecoderThread> {
        self.decoder.as_mut()
    }

    /// Redraw all `elements` at `transform` onto a surface of `surface_size`
    /// pixels. Returns the new generation.
    pub fn redraw(
        &mut self,
        elements: &[Annotation],
        transform: CoordinateTransform,
        surface_size: (u32, u32),
    ) -> u64 {
        self.generation += 1;
        let generation = self.generation;

        self.surface.resize(surface_size.0, surface_size.1);

        let live: HashSet<AnnotationId> = elements.iter().map(|e| e.id).collect();
        self.cache.retain(|id, _| live.contains(id));
        self.broken.retain(|id| live.contains(id));

        self.frame = elements
            .iter()
            .map(|e| FrameEntry::new(e, transform))
            .collect();
        self.awaiting.clear();

        for index in 0..self.frame.len() {
            let entry = self.frame[index].clone();
            self.ensure_decoded(&entry);
        }

        self.recompose();

        log::debug!(
            "Overlay generation {}: {} elements, {} drawn, {} awaiting decode, surface {}x{}",
            generation,
            elements.len(),
            self.stats.drawn,
            self.awaiting.len(),
            surface_size.0,
            surface_size.1
        );

        generation
    }

    fn is_ready(&self, entry: &FrameEntry) -> bool {
        self.cache
            .get(&entry.id)
            .is_some_and(|cached| cached.target == entry.target)
    }

    /// Make sure pixels for `entry` are cached or on their way.
    fn ensure_decoded(&mut self, entry: &FrameEntry) {
        if entry.is_empty() || self.broken.contains(&entry.id) || self.is_ready(entry) {
            return;
        }
        match self.mode {
            DecodeMode::Inline => self.decode_inline(entry),
            DecodeMode::Background => {
                self.awaiting.insert(entry.id);
                self.request_decode(entry);
            }
        }
    }

    fn decode_inline(&mut self, entry: &FrameEntry) {
        match decode_payload(&entry.payload, entry.target) {
            Ok(image) => {
                self.cache.insert(
                    entry.id,
                    CachedImage {
                        image,
                        target: entry.target,
                    },
                );
            }
            Err(e) => {
                log::warn!("Failed to decode {} #{}: {}", entry.kind.name(), entry.id, e);
                self.broken.insert(entry.id);
                self.stats.failed += 1;
            }
        }
    }

    fn request_decode(&mut self, entry: &FrameEntry) {
        let generation = self.generation;
        let sent = match self.decoder.as_mut() {
            // An in-flight request will be re-issued if its size turns out wrong
            Some(decoder) if decoder.is_pending(entry.id) => true,
            Some(decoder) => {
                decoder.request(entry.id, generation, entry.target, entry.payload.clone())
            }
            None => false,
        };
        if !sent {
            self.fall_back_to_inline();
        }
    }

    /// Drop the decoder thread and decode everything still awaiting inline.
    fn fall_back_to_inline(&mut self) {
        if self.mode == DecodeMode::Inline {
            return;
        }
        log::warn!(
            "Decoder thread unavailable, decoding {} pending elements inline",
            self.awaiting.len()
        );
        self.mode = DecodeMode::Inline;
        self.decoder = None;

        let waiting: Vec<FrameEntry> = self
            .frame
            .iter()
            .filter(|e| self.awaiting.contains(&e.id))
            .cloned()
            .collect();
        self.awaiting.clear();
        for entry in &waiting {
            self.decode_inline(entry);
        }
    }

    /// Apply all finished background decodes. Non-blocking.
    ///
    /// Returns the number of completions drawn onto the surface.
    pub fn pump(&mut self) -> usize {
        let mode = self.mode;
        let mut applied = 0;
        while let Some(completion) = self.decoder.as_mut().and_then(|d| d.try_take()) {
            if self.apply(completion) {
                applied += 1;
            }
        }
        self.check_decoder();
        if applied > 0 || self.mode != mode {
            self.recompose();
        }
        applied
    }

    /// Block until every in-flight decode has completed and been applied.
    pub fn wait_for_decodes(&mut self) -> usize {
        let mode = self.mode;
        let mut applied = 0;
        while let Some(completion) = self.decoder.as_mut().and_then(|d| d.take_blocking()) {
            if self.apply(completion) {
                applied += 1;
            }
        }
        self.check_decoder();
        if applied > 0 || self.mode != mode {
            self.recompose();
        }
        applied
    }

    /// Switch to inline decoding if the thread has died.
    fn check_decoder(&mut self) {
        if self.decoder.as_ref().is_some_and(|d| d.is_disconnected()) {
            self.fall_back_to_inline();
        }
    }

    /// Record a completion. Returns `true` if it belongs in the current frame.
    fn apply(&mut self, completion: DecodeCompletion) -> bool {
        let DecodeCompletion {
            id,
            generation,
            target,
            result,
        } = completion;
        let entry = self.frame.iter().find(|e| e.id == id).cloned();

        match result {
            Ok(image) => match entry {
                Some(entry) if self.awaiting.contains(&id) && entry.target == target => {
                    self.awaiting.remove(&id);
                    self.cache.insert(id, CachedImage { image, target });
                    true
                }
                Some(entry) if self.awaiting.contains(&id) => {
                    log::debug!(
                        "Decode of #{} produced {:?}, frame needs {:?} - requesting again",
                        id,
                        target,
                        entry.target
                    );
                    self.stats.stale_discarded += 1;
                    self.request_decode(&entry);
                    false
                }
                _ => {
                    log::debug!(
                        "Discarding stale decode of #{} from generation {} (current {})",
                        id,
                        generation,
                        self.generation
                    );
                    self.stats.stale_discarded += 1;
                    false
                }
            },
            Err(e) => {
                log::warn!("Failed to decode payload of #{}: {}", id, e);
                self.awaiting.remove(&id);
                if entry.is_some() {
                    self.broken.insert(id);
                }
                self.stats.failed += 1;
                false
            }
        }
    }

    /// Repaint the current frame in paint order from cached pixels.
    fn recompose(&mut self) {
        self.surface.clear();
        let mut drawn = 0;
        for entry in &self.frame {
            match self.cache.get(&entry.id) {
                Some(cached) if cached.target == entry.target => {
                    draw(&mut self.surface, &cached.image, entry.rect);
                    drawn += 1;
                }
                _ => {}
            }
        }
        self.stats.generation = self.generation;
        self.stats.drawn = drawn;
        self.stats.awaiting = self.awaiting.len();
    }
}

fn draw(surface: &mut Surface, image: &RgbaImage, rect: ScreenRect) {
    surface.draw_image(image, rect.x, rect.y, rect.width, rect.height);
}
