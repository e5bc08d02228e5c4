//! Editor session scenarios.
//!
//! The collaborators here are fakes: pages are plain white, the signature
//! pad hands back a fixed image and the QR generator returns a solid square.

mod pointer_tests;

use std::cell::RefCell;
use std::rc::Rc;

use docstamp_raster::{RgbaImage, encode_png};
use image::Rgba;

use super::EditorSession;
use crate::collaborators::{
    CollaboratorError, Compositor, EcLevel, PageRenderer, Placement, QrGenerator, SignatureCapture,
};
use crate::config::UserPreferences;
use crate::model::{DocSize, Payload};

pub(super) const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub(super) const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
pub(super) const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub(super) const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

pub(super) fn solid_png(color: Rgba<u8>) -> Payload {
    let img = RgbaImage::from_pixel(8, 8, color);
    Payload::raster(encode_png(&img).unwrap())
}

/// White pages of a fixed size; page 2 is landscape.
pub(super) struct FakePages {
    pub count: usize,
}

impl FakePages {
    pub fn size(page: usize) -> DocSize {
        if page == 2 {
            DocSize::new(400.0, 300.0)
        } else {
            DocSize::new(300.0, 400.0)
        }
    }
}

impl PageRenderer for FakePages {
    fn page_count(&self) -> usize {
        self.count
    }

    fn page_size(&self, page: usize) -> Result<DocSize, CollaboratorError> {
        if page == 0 || page > self.count {
            return Err(CollaboratorError::PageOutOfRange {
                page,
                count: self.count,
            });
        }
        Ok(Self::size(page))
    }

    fn render(&self, page: usize, scale: f32) -> Result<RgbaImage, CollaboratorError> {
        let size = self.page_size(page)?;
        let w = (size.width * scale).ceil() as u32;
        let h = (size.height * scale).ceil() as u32;
        Ok(RgbaImage::from_pixel(w, h, WHITE))
    }
}

/// A signature pad that already holds a drawing (or nothing).
pub(super) struct FakePad {
    pub drawing: Option<Payload>,
    pub clears: usize,
}

impl FakePad {
    pub fn drawn() -> Self {
        Self {
            drawing: Some(solid_png(RED)),
            clears: 0,
        }
    }

    pub fn empty() -> Self {
        Self {
            drawing: None,
            clears: 0,
        }
    }
}

impl SignatureCapture for FakePad {
    fn clear(&mut self) {
        self.drawing = None;
        self.clears += 1;
    }

    fn is_empty(&self) -> bool {
        self.drawing.is_none()
    }

    fn export_image(&self) -> Result<Option<Payload>, CollaboratorError> {
        Ok(self.drawing.clone())
    }
}

/// Returns a blue square and records every request.
#[derive(Clone, Default)]
pub(super) struct FakeQr {
    pub requests: Rc<RefCell<Vec<(String, u32, EcLevel)>>>,
}

impl QrGenerator for FakeQr {
    fn generate(
        &self,
        text: &str,
        size: u32,
        level: EcLevel,
    ) -> Result<Payload, CollaboratorError> {
        self.requests
            .borrow_mut()
            .push((text.to_string(), size, level));
        let img = RgbaImage::from_pixel(size, size, BLUE);
        Ok(Payload::raster(encode_png(&img)?))
    }
}

/// Collects whatever it is asked to composite.
#[derive(Default)]
pub(super) struct FakeCompositor {
    pub received: Vec<Placement>,
    pub fail: bool,
}

impl Compositor for FakeCompositor {
    fn composite(&mut self, placements: &[Placement]) -> Result<(), CollaboratorError> {
        if self.fail {
            return Err(CollaboratorError::Export("disk full".to_string()));
        }
        self.received.extend_from_slice(placements);
        Ok(())
    }
}

pub(super) fn session_with(pad: FakePad, preferences: UserPreferences) -> EditorSession<FakePad> {
    EditorSession::new(FakePages { count: 3 }, pad, FakeQr::default(), preferences)
}

pub(super) fn session() -> EditorSession<FakePad> {
    session_with(FakePad::drawn(), UserPreferences::default())
}

pub(super) fn pixel(session: &EditorSession<FakePad>, x: u32, y: u32) -> Rgba<u8> {
    *session.overlay().pixels().get_pixel(x, y)
}
