//! Background thread for payload decoding.
//!
//! Decoding a payload (PNG decode or SVG rasterization) is the only slow step
//! of a redraw. `DecoderThread` moves it off the event thread: requests go in
//! over a channel, completions come back over another and are picked up by
//! the renderer when it is pumped.

use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use docstamp_raster::{RasterError, RgbaImage, decode_raster, rasterize_svg};

use crate::model::{AnnotationId, Payload};

/// Pixel size an SVG payload is rasterized at. `None` for raster payloads,
/// which decode to their own size and are scaled when drawn.
pub type DecodeTarget = Option<(u32, u32)>;

/// Decode a payload into RGBA pixels on the calling thread.
///
/// SVG payloads are rasterized at `target` when given, so vector content is
/// drawn without resampling.
pub fn decode_payload(payload: &Payload, target: DecodeTarget) -> Result<RgbaImage, RasterError> {
    match payload {
        Payload::Raster(bytes) => decode_raster(bytes),
        Payload::Svg(markup) => rasterize_svg(markup, target),
    }
}

/// Request to decode one annotation's payload.
struct DecodeRequest {
    id: AnnotationId,
    /// Redraw generation that asked for this decode
    generation: u64,
    target: DecodeTarget,
    payload: Payload,
}

/// Result of a decode request.
pub struct DecodeCompletion {
    pub id: AnnotationId,
    pub generation: u64,
    pub target: DecodeTarget,
    pub result: Result<RgbaImage, RasterError>,
}

/// Message sent to the decoder thread.
enum ThreadMessage {
    /// Decode a payload
    Decode(DecodeRequest),
    /// Shutdown the thread
    Shutdown,
}

/// Manages a background thread for payload decoding.
pub struct DecoderThread {
    /// Sender for requests to the background thread
    request_tx: Sender<ThreadMessage>,
    /// Receiver for results from the background thread
    result_rx: Receiver<DecodeCompletion>,
    /// Handle to the background thread (for joining on drop)
    thread_handle: Option<JoinHandle<()>>,
    /// Annotations with a request in flight
    pending: HashSet<AnnotationId>,
    /// Set once the thread stopped answering
    disconnected: bool,
}

impl DecoderThread {
    /// Spawn a new decoder thread.
    pub fn spawn() -> std::io::Result<Self> {
        let (request_tx, request_rx) = mpsc::channel::<ThreadMessage>();
        let (result_tx, result_rx) = mpsc::channel::<DecodeCompletion>();

        let thread_handle = thread::Builder::new()
            .name("payload-decoder".to_string())
            .spawn(move || {
                log::debug!("Payload decoder thread started");
                Self::thread_loop(request_rx, result_tx);
                log::debug!("Payload decoder thread exiting");
            })?;

        Ok(Self {
            request_tx,
            result_rx,
            thread_handle: Some(thread_handle),
            pending: HashSet::new(),
            disconnected: false,
        })
    }

    /// Background thread main loop.
    fn thread_loop(request_rx: Receiver<ThreadMessage>, result_tx: Sender<DecodeCompletion>) {
        while let Ok(ThreadMessage::Decode(request)) = request_rx.recv() {
            let result = decode_payload(&request.payload, request.target);
            let completion = DecodeCompletion {
                id: request.id,
                generation: request.generation,
                target: request.target,
                result,
            };
            if result_tx.send(completion).is_err() {
                log::warn!("Result channel closed, decoder thread exiting");
                break;
            }
        }
    }

    /// Queue a payload for decoding.
    ///
    /// Returns `false` if the thread is gone and the request was dropped.
    pub fn request(
        &mut self,
        id: AnnotationId,
        generation: u64,
        target: DecodeTarget,
        payload: Payload,
    ) -> bool {
        let request = DecodeRequest {
            id,
            generation,
            target,
            payload,
        };
        if self.request_tx.send(ThreadMessage::Decode(request)).is_err() {
            log::error!("Failed to send decode request for #{}: channel closed", id);
            self.disconnected = true;
            return false;
        }
        self.pending.insert(id);
        true
    }

    /// Take one completed result, if any. Non-blocking.
    pub fn try_take(&mut self) -> Option<DecodeCompletion> {
        match self.result_rx.try_recv() {
            Ok(completion) => {
                self.pending.remove(&completion.id);
                Some(completion)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::warn!("Decoder thread disconnected");
                self.pending.clear();
                self.disconnected = true;
                None
            }
        }
    }

    /// Wait for the next completed result. Returns `None` when nothing is pending.
    pub fn take_blocking(&mut self) -> Option<DecodeCompletion> {
        if self.pending.is_empty() {
            return None;
        }
        match self.result_rx.recv() {
            Ok(completion) => {
                self.pending.remove(&completion.id);
                Some(completion)
            }
            Err(_) => {
                log::warn!("Decoder thread disconnected");
                self.pending.clear();
                self.disconnected = true;
                None
            }
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, id: AnnotationId) -> bool {
        self.pending.contains(&id)
    }

    /// Whether the thread has stopped; no further requests will be served.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    /// Stop the thread and wait for it to exit. Results already produced can
    /// still be taken.
    pub fn shutdown(&mut self) {
        let _ = self.request_tx.send(ThreadMessage::Shutdown);

        if let Some(handle) = self.thread_handle.take() {
            if let Err(e) = handle.join() {
                log::warn!("Decoder thread panicked: {:?}", e);
            }
        }
    }
}

impl Drop for DecoderThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}
