//! Overlay rendering: payload decoding and surface redraws.

mod decoder;
mod renderer;

pub use decoder::{DecodeCompletion, DecodeTarget, DecoderThread, decode_payload};
pub use renderer::{DecodeMode, OverlayRenderer, RenderStats};

#[cfg(test)]
mod tests;
