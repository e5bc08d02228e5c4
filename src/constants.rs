//! Global constants for docstamp

/// Default size of a signature annotation (document units)
pub const DEFAULT_SIGNATURE_SIZE: (f32, f32) = (200.0, 100.0);

/// Default size of a QR code annotation (document units)
pub const DEFAULT_QR_SIZE: (f32, f32) = (100.0, 100.0);

/// Where newly added annotations are placed (document units)
pub const DEFAULT_PLACEMENT: (f32, f32) = (50.0, 50.0);

/// Zoom limits and slider step
pub const MIN_SCALE: f32 = 0.5;
pub const MAX_SCALE: f32 = 2.0;
pub const SCALE_STEP: f32 = 0.1;

/// Pixel size QR codes are generated at
pub const QR_GENERATE_SIZE: u32 = 100;

/// Text prefilled into the QR input
pub const DEFAULT_QR_TEXT: &str = "https://example.com";

/// Signature pad canvas size in pixels
pub const SIGNATURE_PAD_SIZE: (u32, u32) = (400, 160);
