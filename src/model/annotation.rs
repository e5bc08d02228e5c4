//! Annotation types.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::geometry::{DocPoint, DocRect, DocSize};
use crate::constants::{DEFAULT_QR_SIZE, DEFAULT_SIGNATURE_SIZE};

/// Unique identifier for an annotation.
///
/// Allocated by the store when the annotation is added and never reused,
/// so it stays valid across removals that shift sequence indices.
pub type AnnotationId = u64;

/// The kinds of annotation that can be placed on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    /// A captured handwritten signature
    Signature,
    /// A generated QR code
    QrCode,
}

impl AnnotationKind {
    /// Get the display name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            AnnotationKind::Signature => "Signature",
            AnnotationKind::QrCode => "QR Code",
        }
    }

    /// Get all annotation kinds.
    pub fn all() -> &'static [AnnotationKind] {
        &[AnnotationKind::Signature, AnnotationKind::QrCode]
    }

    /// Default document-space size for newly added annotations of this kind.
    pub fn default_size(&self) -> DocSize {
        let (w, h) = match self {
            AnnotationKind::Signature => DEFAULT_SIGNATURE_SIZE,
            AnnotationKind::QrCode => DEFAULT_QR_SIZE,
        };
        DocSize::new(w, h)
    }
}

/// Image content of an annotation.
///
/// Payloads are immutable once created and cheap to clone, so they can be
/// handed to a decoder thread without copying.
#[derive(Clone, PartialEq, Eq)]
pub enum Payload {
    /// Encoded raster image bytes (PNG, JPEG)
    Raster(Arc<[u8]>),
    /// SVG markup
    Svg(Arc<str>),
}

impl Payload {
    pub fn raster(bytes: impl Into<Vec<u8>>) -> Self {
        Payload::Raster(Arc::from(bytes.into()))
    }

    pub fn svg(markup: impl Into<String>) -> Self {
        Payload::Svg(Arc::from(markup.into()))
    }

    /// Size of the payload content in bytes.
    pub fn len(&self) -> usize {
        match self {
            Payload::Raster(bytes) => bytes.len(),
            Payload::Svg(markup) => markup.len(),
        }
    }

    /// A payload with no content is treated as absent.
    pub fn is_empty(&self) -> bool {
        match self {
            Payload::Raster(bytes) => bytes.is_empty(),
            Payload::Svg(markup) => markup.trim().is_empty(),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Raster(bytes) => write!(f, "Raster({} bytes)", bytes.len()),
            Payload::Svg(markup) => write!(f, "Svg({} bytes)", markup.len()),
        }
    }
}

/// A single annotation placed on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Stable identifier
    pub id: AnnotationId,
    /// Signature or QR code
    pub kind: AnnotationKind,
    /// Top-left corner in document space
    pub position: DocPoint,
    /// Size in document space
    pub size: DocSize,
    /// Image content
    pub payload: Payload,
}

impl Annotation {
    /// Bounding rectangle in document space.
    pub fn bounds(&self) -> DocRect {
        DocRect::new(self.position, self.size)
    }
}

/// Request to add an annotation to the store.
///
/// The payload is optional because the UI offers "add" before the user has
/// saved a signature or typed QR text; such requests are rejected.
#[derive(Debug, Clone)]
pub struct NewAnnotation {
    pub kind: AnnotationKind,
    pub payload: Option<Payload>,
    /// Placement; the default position is used when unset
    pub position: Option<DocPoint>,
    /// Size; the kind's default size is used when unset
    pub size: Option<DocSize>,
}

impl NewAnnotation {
    pub fn new(kind: AnnotationKind, payload: Option<Payload>) -> Self {
        Self {
            kind,
            payload,
            position: None,
            size: None,
        }
    }

    pub fn signature(payload: Payload) -> Self {
        Self::new(AnnotationKind::Signature, Some(payload))
    }

    pub fn qr_code(payload: Payload) -> Self {
        Self::new(AnnotationKind::QrCode, Some(payload))
    }

    pub fn at(mut self, position: DocPoint) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_size(mut self, size: DocSize) -> Self {
        self.size = Some(size);
        self
    }
}
