//! Annotation data model.
//!
//! All positions and sizes are stored in document space; screen-space values
//! are derived on demand through [`crate::transform::CoordinateTransform`].

mod annotation;
mod geometry;

pub use annotation::{Annotation, AnnotationId, AnnotationKind, NewAnnotation, Payload};
pub use geometry::{DocPoint, DocRect, DocSize, ScreenPoint, ScreenRect};
