//! Error types for overlay operations.
//!
//! Every error here is a rejected operation. None of them leave the store in
//! a partially modified state.

use docstamp_raster::RasterError;
use thiserror::Error;

use crate::collaborators::CollaboratorError;
use crate::model::{AnnotationId, AnnotationKind};

/// Errors returned by the element store and the operations built on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverlayError {
    /// `add` was called before the kind's payload was ready
    #[error("No {} payload available", .kind.name())]
    MissingPayload {
        /// Kind of the rejected annotation
        kind: AnnotationKind,
    },

    /// Index does not address a current element
    #[error("Index {index} out of range (len {len})")]
    OutOfRange {
        /// The requested index
        index: usize,
        /// Number of elements at the time of the call
        len: usize,
    },

    /// Identifier does not address a current element
    #[error("Unknown annotation id {0}")]
    UnknownAnnotation(AnnotationId),
}

impl OverlayError {
    /// Create an out of range error.
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::OutOfRange { index, len }
    }
}

/// Errors returned by editor session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The store rejected the operation
    #[error(transparent)]
    Overlay(#[from] OverlayError),

    /// A collaborator failed
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    /// Pixel-level failure
    #[error(transparent)]
    Raster(#[from] RasterError),
}
