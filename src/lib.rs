//! docstamp - Annotation Overlay Engine
//!
//! Places signature and QR code annotations on top of rendered document pages.
//! Annotations are kept in document space; the overlay is redrawn in screen
//! space at the current zoom and handed to a compositor on export.

pub mod collaborators;
pub mod config;
pub mod constants;
pub mod drag;
pub mod editor;
pub mod error;
pub mod model;
pub mod render;
pub mod store;
pub mod transform;

pub use collaborators::{
    CollaboratorError, Compositor, EcLevel, PageRenderer, Placement, QrGenerator,
    SignatureCapture, SvgQrGenerator,
};
pub use config::{AppConfig, ConfigError, LogLevel, UserPreferences};
pub use drag::{DragController, DragOutcome, DragState, PointerButton, PointerEvent};
pub use editor::EditorSession;
pub use error::{OverlayError, SessionError};
pub use hit_test::HitTester;
pub use model::{
    Annotation, AnnotationId, AnnotationKind, DocPoint, DocRect, DocSize, NewAnnotation, Payload,
    ScreenPoint, ScreenRect,
};
pub use render::{DecodeMode, OverlayRenderer, RenderStats};
pub use store::ElementStore;
pub use transform::{CoordinateTransform, ScaleBounds};
