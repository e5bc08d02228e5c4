//! QR generator backed by the `qrcode` crate.

use qrcode::QrCode;
use qrcode::render::svg;

use super::{CollaboratorError, EcLevel, QrGenerator};
use crate::model::Payload;

/// Generates QR symbols as SVG markup: black modules on white, no quiet zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgQrGenerator;

impl SvgQrGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl From<EcLevel> for qrcode::EcLevel {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::L => qrcode::EcLevel::L,
            EcLevel::M => qrcode::EcLevel::M,
            EcLevel::Q => qrcode::EcLevel::Q,
            EcLevel::H => qrcode::EcLevel::H,
        }
    }
}

impl QrGenerator for SvgQrGenerator {
    fn generate(
        &self,
        text: &str,
        size: u32,
        level: EcLevel,
    ) -> Result<Payload, CollaboratorError> {
        if text.is_empty() {
            return Err(CollaboratorError::Qr("empty text".to_string()));
        }

        let code = QrCode::with_error_correction_level(text.as_bytes(), level.into())
            .map_err(|e| CollaboratorError::Qr(e.to_string()))?;

        let markup = code
            .render::<svg::Color<'_>>()
            .min_dimensions(size, size)
            .quiet_zone(false)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build();

        log::debug!(
            "Generated QR code ({} modules, level {:?}) for {} bytes of text",
            code.width(),
            level,
            text.len()
        );

        Ok(Payload::svg(markup))
    }
}
