//! Headless docstamp session.
//!
//! Signs a blank page: draws a signature on the pad, places it together with
//! a QR code, drags the QR code into the corner and writes the composited
//! page to a PNG file (`docstamp-demo.png` unless a path is given).

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = demo::run() {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

// WASM has no use for the headless demo
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::error::Error;
    use std::path::PathBuf;

    use docstamp::constants::SIGNATURE_PAD_SIZE;
    use docstamp::{
        AppConfig, CollaboratorError, DocPoint, DocSize, EditorSession, PageRenderer, PointerButton,
        PointerEvent, ScreenPoint, SvgQrGenerator,
    };
    use docstamp_raster::{RgbaImage, StrokePad};
    use image::Rgba;

    /// US Letter in points
    const PAGE_SIZE: DocSize = DocSize {
        width: 612.0,
        height: 792.0,
    };

    /// Stands in for a document rasterizer: every page is plain white.
    struct BlankPageRenderer {
        pages: usize,
        size: DocSize,
    }

    impl PageRenderer for BlankPageRenderer {
        fn page_count(&self) -> usize {
            self.pages
        }

        fn page_size(&self, page: usize) -> Result<DocSize, CollaboratorError> {
            if page == 0 || page > self.pages {
                return Err(CollaboratorError::PageOutOfRange {
                    page,
                    count: self.pages,
                });
            }
            Ok(self.size)
        }

        fn render(&self, page: usize, scale: f32) -> Result<RgbaImage, CollaboratorError> {
            let size = self.page_size(page)?;
            let width = (size.width * scale).ceil() as u32;
            let height = (size.height * scale).ceil() as u32;
            Ok(RgbaImage::from_pixel(
                width,
                height,
                Rgba([255, 255, 255, 255]),
            ))
        }
    }

    /// A looping scribble across the pad.
    fn scribble(pad: &mut StrokePad) {
        let (w, h) = pad.dimensions();
        let (w, h) = (w as f32, h as f32);

        pad.begin_stroke(0.1 * w, 0.7 * h);
        for i in 1..=40 {
            let t = i as f32 / 40.0;
            let x = 0.1 * w + 0.8 * w * t;
            let y = 0.5 * h + 0.25 * h * (t * 18.0).sin();
            pad.extend_stroke(x, y);
        }
        pad.end_stroke();

        pad.begin_stroke(0.15 * w, 0.85 * h);
        pad.extend_stroke(0.85 * w, 0.8 * h);
        pad.end_stroke();
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let config = AppConfig::load_from_default_path().unwrap_or_default();
        let preferences = config.preferences;

        env_logger::Builder::new()
            .filter_level(preferences.log_level.to_level_filter())
            .parse_default_env()
            .init();

        let output = std::env::args()
            .nth(1)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("docstamp-demo.png"));

        let pages = BlankPageRenderer {
            pages: 2,
            size: PAGE_SIZE,
        };
        let pad = StrokePad::new(SIGNATURE_PAD_SIZE.0, SIGNATURE_PAD_SIZE.1);
        let mut session = EditorSession::new(pages, pad, SvgQrGenerator::new(), preferences);

        scribble(session.signature_pad_mut());
        session.save_signature()?;
        session.add_signature()?;
        let qr = session.add_qr_code()?;
        log::info!("Placed: {}", session.element_labels().join(", "));

        // Drag the QR code (topmost) to the lower right corner of the page
        let transform = session.transform();
        let grab = session
            .store()
            .get_by_id(qr)
            .map(|a| transform.to_screen(a.position))
            .ok_or("QR code missing after add")?;
        let target = transform.to_screen(DocPoint::new(
            PAGE_SIZE.width - 100.0,
            PAGE_SIZE.height - 100.0,
        ));
        session.handle_pointer(PointerEvent::Down {
            position: ScreenPoint::new(grab.x + 1.0, grab.y + 1.0),
            button: PointerButton::Primary,
        });
        session.handle_pointer(PointerEvent::Move { position: target });
        session.handle_pointer(PointerEvent::Up);

        for placement in session.placements() {
            log::info!(
                "{} on page {} at ({:.1}, {:.1}) size {:.0}x{:.0}",
                placement.kind.name(),
                placement.page,
                placement.rect.x,
                placement.rect.y,
                placement.rect.width,
                placement.rect.height
            );
        }

        let page = session.composite_page()?;
        page.save(&output)?;
        println!(
            "Wrote {} ({}x{} at {})",
            output.display(),
            page.width(),
            page.height(),
            session.scale_label()
        );
        Ok(())
    }
}
