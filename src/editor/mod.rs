//! Editor session.
//!
//! Ties the annotation store, the drag controller and the overlay renderer
//! to the document being annotated. The session owns the zoom level and the
//! page being shown, keeps the saved signature and the QR input text, and
//! redraws the overlay whenever something it displays changes.
//!
//! Annotations live on a single working page. Paging only changes which page
//! is rendered beneath the overlay; placements are reported against the page
//! currently shown.

#[cfg(test)]
mod tests;

use docstamp_raster::{RgbaImage, Surface, encode_png};

use crate::collaborators::{
    CollaboratorError, Compositor, PageRenderer, Placement, QrGenerator, SignatureCapture,
};
use crate::config::UserPreferences;
use crate::drag::{DragController, DragOutcome, PointerEvent};
use crate::error::{OverlayError, SessionError};
use crate::model::{Annotation, AnnotationId, AnnotationKind, NewAnnotation, Payload};
use crate::render::{OverlayRenderer, RenderStats, decode_payload};
use crate::store::ElementStore;
use crate::transform::{CoordinateTransform, ScaleBounds};

/// An annotation editing session over one document.
pub struct EditorSession<S: SignatureCapture> {
    pages: Box<dyn PageRenderer>,
    signature_pad: S,
    qr_generator: Box<dyn QrGenerator>,
    preferences: UserPreferences,

    store: ElementStore,
    drag: DragController,
    renderer: OverlayRenderer,
    transform: CoordinateTransform,

    /// Page shown beneath the overlay (1-based)
    page: usize,
    /// Signature image saved from the pad, ready to be placed
    saved_signature: Option<Payload>,
    /// Text encoded by the next QR code
    qr_text: String,
}

impl<S: SignatureCapture> EditorSession<S> {
    pub fn new(
        pages: impl PageRenderer + 'static,
        signature_pad: S,
        qr_generator: impl QrGenerator + 'static,
        preferences: UserPreferences,
    ) -> Self {
        let transform =
            CoordinateTransform::clamped(preferences.initial_scale, &preferences.scale_bounds);
        let store = ElementStore::new().with_default_position(preferences.placement());
        let renderer = OverlayRenderer::new(preferences.decode_mode);
        let qr_text = preferences.qr_text.clone();

        log::info!(
            "Editor session started: {} pages, scale {:.1}, {:?} decoding",
            pages.page_count(),
            transform.scale(),
            renderer.mode()
        );

        let mut session = Self {
            pages: Box::new(pages),
            signature_pad,
            qr_generator: Box::new(qr_generator),
            preferences,
            store,
            drag: DragController::new(),
            renderer,
            transform,
            page: 1,
            saved_signature: None,
            qr_text,
        };
        session.refresh();
        session
    }

    // ========================================================================
    // Paging
    // ========================================================================

    /// Current page (1-based).
    pub fn page_number(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.pages.page_count()
    }

    /// Show `page`, clamped into the document. Returns the page now shown.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        let last = self.page_count().max(1);
        let page = page.clamp(1, last);
        if page != self.page {
            log::debug!("Page {} -> {} of {}", self.page, page, last);
            self.page = page;
            self.refresh();
        }
        self.page
    }

    pub fn next_page(&mut self) -> usize {
        self.go_to_page(self.page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> usize {
        self.go_to_page(self.page.saturating_sub(1))
    }

    // ========================================================================
    // Zoom
    // ========================================================================

    pub fn scale(&self) -> f32 {
        self.transform.scale()
    }

    pub fn transform(&self) -> CoordinateTransform {
        self.transform
    }

    pub fn scale_bounds(&self) -> &ScaleBounds {
        &self.preferences.scale_bounds
    }

    /// Set the zoom, clamped into the configured bounds. Returns the applied scale.
    pub fn set_scale(&mut self, scale: f32) -> f32 {
        self.apply_transform(CoordinateTransform::clamped(
            scale,
            &self.preferences.scale_bounds,
        ))
    }

    pub fn zoom_in(&mut self) -> f32 {
        self.apply_transform(self.transform.zoom_in(&self.preferences.scale_bounds))
    }

    pub fn zoom_out(&mut self) -> f32 {
        self.apply_transform(self.transform.zoom_out(&self.preferences.scale_bounds))
    }

    /// Zoom as shown next to the slider, e.g. `"1.0x"`.
    pub fn scale_label(&self) -> String {
        format!("{:.1}x", self.transform.scale())
    }

    fn apply_transform(&mut self, transform: CoordinateTransform) -> f32 {
        if transform != self.transform {
            log::debug!(
                "Scale {:.2} -> {:.2}",
                self.transform.scale(),
                transform.scale()
            );
            self.transform = transform;
            self.refresh();
        }
        self.transform.scale()
    }

    // ========================================================================
    // Signature
    // ========================================================================

    pub fn signature_pad(&self) -> &S {
        &self.signature_pad
    }

    pub fn signature_pad_mut(&mut self) -> &mut S {
        &mut self.signature_pad
    }

    /// Export the pad drawing as the saved signature.
    ///
    /// Returns `true` if a signature is now saved. An empty pad clears the
    /// saved signature.
    pub fn save_signature(&mut self) -> Result<bool, SessionError> {
        self.saved_signature = self.signature_pad.export_image()?;
        match &self.saved_signature {
            Some(payload) => log::info!("Saved signature ({} bytes)", payload.len()),
            None => log::warn!("Signature pad is empty - nothing saved"),
        }
        Ok(self.saved_signature.is_some())
    }

    /// Clear the pad and forget the saved signature.
    pub fn clear_signature(&mut self) {
        self.signature_pad.clear();
        self.saved_signature = None;
        log::debug!("Signature cleared");
    }

    pub fn has_signature(&self) -> bool {
        self.saved_signature.is_some()
    }

    pub fn saved_signature(&self) -> Option<&Payload> {
        self.saved_signature.as_ref()
    }

    /// Place the saved signature on the page.
    pub fn add_signature(&mut self) -> Result<AnnotationId, OverlayError> {
        self.add(AnnotationKind::Signature, self.saved_signature.clone())
    }

    // ========================================================================
    // QR code
    // ========================================================================

    pub fn qr_text(&self) -> &str {
        &self.qr_text
    }

    pub fn set_qr_text(&mut self, text: impl Into<String>) {
        self.qr_text = text.into();
    }

    /// Generate a QR code for the current text and place it on the page.
    pub fn add_qr_code(&mut self) -> Result<AnnotationId, SessionError> {
        let payload = self.generate_qr(self.preferences.qr_pixels)?;
        Ok(self.add(AnnotationKind::QrCode, payload)?)
    }

    /// PNG bytes of the QR code for the current text at `size` pixels.
    pub fn qr_preview_png(&self, size: u32) -> Result<Vec<u8>, SessionError> {
        let payload = self
            .generate_qr(size)?
            .ok_or(OverlayError::MissingPayload {
                kind: AnnotationKind::QrCode,
            })?;
        let image = decode_payload(&payload, Some((size, size)))?;
        Ok(encode_png(&image)?)
    }

    fn generate_qr(&self, size: u32) -> Result<Option<Payload>, CollaboratorError> {
        if self.qr_text.is_empty() {
            return Ok(None);
        }
        let payload = self.qr_generator.generate(
            &self.qr_text,
            size,
            self.preferences.qr_error_correction,
        )?;
        Ok(Some(payload))
    }

    // ========================================================================
    // Elements
    // ========================================================================

    fn add(
        &mut self,
        kind: AnnotationKind,
        payload: Option<Payload>,
    ) -> Result<AnnotationId, OverlayError> {
        let request = NewAnnotation::new(kind, payload)
            .at(self.preferences.placement())
            .with_size(self.preferences.size_for(kind));
        let id = self.store.add(request).inspect_err(|e| {
            log::warn!("Cannot add {}: {}", kind.name(), e);
        })?;
        self.refresh_if_dirty();
        Ok(id)
    }

    /// Remove the annotation at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Annotation, OverlayError> {
        let removed = self.store.remove(index).inspect_err(|e| {
            log::warn!("Cannot remove element: {}", e);
        })?;
        self.refresh_if_dirty();
        Ok(removed)
    }

    /// Annotations in paint order.
    pub fn elements(&self) -> &[Annotation] {
        self.store.list()
    }

    /// Display labels for the element list, e.g. `"1. Signature"`.
    pub fn element_labels(&self) -> Vec<String> {
        self.store
            .list()
            .iter()
            .enumerate()
            .map(|(i, a)| format!("{}. {}", i + 1, a.kind.name()))
            .collect()
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    // ========================================================================
    // Pointer
    // ========================================================================

    /// Route a pointer event on the overlay surface.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> DragOutcome {
        let outcome = self.drag.handle(event, &mut self.store, self.transform);
        self.refresh_if_dirty();
        outcome
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Redraw the overlay for the current elements, page and zoom.
    /// Returns the new render generation.
    pub fn refresh(&mut self) -> u64 {
        let size = self.surface_size();
        let generation = self.renderer.redraw(self.store.list(), self.transform, size);
        self.store.clear_dirty();
        generation
    }

    fn refresh_if_dirty(&mut self) {
        if self.store.is_dirty() {
            self.refresh();
        }
    }

    /// Pixel size of the page shown at the current zoom.
    fn surface_size(&self) -> (u32, u32) {
        match self.pages.page_size(self.page) {
            Ok(size) => self.transform.to_pixel_size(size),
            Err(e) => {
                log::warn!("No size for page {}: {}", self.page, e);
                (0, 0)
            }
        }
    }

    /// Apply finished background decodes. Returns how many were drawn.
    pub fn pump(&mut self) -> usize {
        self.renderer.pump()
    }

    /// Block until every pending decode has been applied.
    pub fn wait_for_decodes(&mut self) -> usize {
        self.renderer.wait_for_decodes()
    }

    pub fn overlay(&self) -> &Surface {
        self.renderer.surface()
    }

    pub fn render_stats(&self) -> RenderStats {
        self.renderer.stats()
    }

    /// Rasterize the current page at the current zoom.
    pub fn render_page(&self) -> Result<RgbaImage, CollaboratorError> {
        self.pages.render(self.page, self.transform.scale())
    }

    /// The current page with the overlay blended on top.
    ///
    /// Waits for pending background decodes so the result is complete.
    pub fn composite_page(&mut self) -> Result<RgbaImage, SessionError> {
        self.refresh_if_dirty();
        self.renderer.wait_for_decodes();

        let mut page = self.render_page()?;
        let overlay = self.renderer.surface();
        if page.dimensions() != overlay.dimensions() {
            log::warn!(
                "Page {} rendered at {:?} but overlay is {:?}",
                self.page,
                page.dimensions(),
                overlay.dimensions()
            );
        }
        overlay.composite_onto(&mut page);
        Ok(page)
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Every annotation with its document-space rectangle on the current page.
    pub fn placements(&self) -> Vec<Placement> {
        self.store
            .list()
            .iter()
            .map(|a| Placement::from_annotation(a, self.page))
            .collect()
    }

    /// Hand all placements to `compositor`. Returns how many were exported.
    pub fn export(&self, compositor: &mut dyn Compositor) -> Result<usize, CollaboratorError> {
        let placements = self.placements();
        compositor.composite(&placements)?;
        log::info!(
            "Exported {} annotations on page {}",
            placements.len(),
            self.page
        );
        Ok(placements.len())
    }
}
