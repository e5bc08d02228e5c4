//! Boundaries to the services the overlay engine consumes and feeds.
//!
//! The engine never rasterizes documents, captures signatures, encodes QR
//! symbols or writes output documents itself. Each of those is a trait here
//! so hosts can plug in real implementations and tests can plug in fakes.

mod qr;

pub use qr::SvgQrGenerator;

use docstamp_raster::{RasterError, RgbaImage, StrokePad};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Annotation, AnnotationKind, DocRect, DocSize, Payload};

/// Errors reported by external collaborators.
#[derive(Error, Debug)]
pub enum CollaboratorError {
    /// Requested page does not exist
    #[error("Page {page} out of range (document has {count} pages)")]
    PageOutOfRange {
        /// The requested 1-based page number
        page: usize,
        /// Number of pages in the document
        count: usize,
    },

    /// Page rasterization failed
    #[error("Render error: {0}")]
    Render(String),

    /// QR symbol could not be generated
    #[error("QR generation failed: {0}")]
    Qr(String),

    /// Pixel-level failure
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// Writing the output document failed
    #[error("Export failed: {0}")]
    Export(String),
}

/// Turns a page number and zoom into pixels.
pub trait PageRenderer {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Unscaled size of a page (1-based).
    fn page_size(&self, page: usize) -> Result<DocSize, CollaboratorError>;

    /// Rasterize a page (1-based) at `scale`.
    ///
    /// The result must be exactly `ceil(page_size * scale)` pixels so the
    /// overlay lines up with it.
    fn render(&self, page: usize, scale: f32) -> Result<RgbaImage, CollaboratorError>;
}

/// Produces signature images from pointer strokes.
pub trait SignatureCapture {
    /// Discard everything drawn so far.
    fn clear(&mut self);

    /// Whether nothing has been drawn.
    fn is_empty(&self) -> bool;

    /// Export the drawing, or `None` if nothing was drawn.
    fn export_image(&self) -> Result<Option<Payload>, CollaboratorError>;
}

impl SignatureCapture for StrokePad {
    fn clear(&mut self) {
        StrokePad::clear(self);
    }

    fn is_empty(&self) -> bool {
        StrokePad::is_empty(self)
    }

    fn export_image(&self) -> Result<Option<Payload>, CollaboratorError> {
        Ok(self.export_png()?.map(Payload::raster))
    }
}

/// QR error correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EcLevel {
    /// ~7% recovery
    #[default]
    L,
    /// ~15% recovery
    M,
    /// ~25% recovery
    Q,
    /// ~30% recovery
    H,
}

/// Encodes text as a QR symbol image.
pub trait QrGenerator {
    /// Generate a `size` x `size` pixel QR symbol for `text`.
    fn generate(&self, text: &str, size: u32, level: EcLevel)
    -> Result<Payload, CollaboratorError>;
}

/// One annotation as handed to the compositor.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub kind: AnnotationKind,
    /// 1-based page the annotation is placed on
    pub page: usize,
    /// Document-space rectangle
    pub rect: DocRect,
    pub payload: Payload,
}

impl Placement {
    pub fn from_annotation(annotation: &Annotation, page: usize) -> Self {
        Self {
            kind: annotation.kind,
            page,
            rect: annotation.bounds(),
            payload: annotation.payload.clone(),
        }
    }
}

/// Burns placed annotations into an output document.
pub trait Compositor {
    fn composite(&mut self, placements: &[Placement]) -> Result<(), CollaboratorError>;
}
