//! Ordered annotation storage.
//!
//! The store keeps annotations in insertion order. Order is the stacking
//! order: later elements are painted on top and win hit-test ties. Elements
//! can be addressed by their current index (which shifts on removal) or by
//! their stable [`AnnotationId`].

use crate::constants::DEFAULT_PLACEMENT;
use crate::error::OverlayError;
use crate::model::{Annotation, AnnotationId, DocPoint, NewAnnotation};

/// Storage for the annotations placed on the working page.
#[derive(Debug, Clone)]
pub struct ElementStore {
    /// Annotations in insertion (paint) order.
    elements: Vec<Annotation>,
    /// Counter for generating unique annotation IDs.
    next_id: AnnotationId,
    /// Position used when a new annotation does not specify one.
    default_position: DocPoint,
    /// Incremented on every successful mutation.
    revision: u64,
    /// Dirty flag - set on every mutation, cleared once the overlay is redrawn.
    dirty: bool,
}

impl ElementStore {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            next_id: 1,
            default_position: DocPoint::new(DEFAULT_PLACEMENT.0, DEFAULT_PLACEMENT.1),
            revision: 0,
            dirty: true, // Start dirty so the first redraw happens
        }
    }

    /// Use a different placement for annotations added without a position.
    pub fn with_default_position(mut self, position: DocPoint) -> Self {
        self.default_position = position;
        self
    }

    /// Check if the store has been modified since last clear_dirty().
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag. Call after redrawing the overlay.
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Mutation counter; changes whenever the contents change.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.dirty = true;
    }

    /// Append an annotation and return its ID.
    ///
    /// Rejected with [`OverlayError::MissingPayload`] when the payload is
    /// absent or empty; the store is left untouched in that case.
    pub fn add(&mut self, request: NewAnnotation) -> Result<AnnotationId, OverlayError> {
        let kind = request.kind;
        let payload = match request.payload {
            Some(p) if !p.is_empty() => p,
            _ => {
                log::debug!("Rejected {} add: payload not ready", kind.name());
                return Err(OverlayError::MissingPayload { kind });
            }
        };

        let id = self.next_id;
        self.next_id += 1;

        let annotation = Annotation {
            id,
            kind,
            position: request.position.unwrap_or(self.default_position),
            size: request.size.unwrap_or_else(|| kind.default_size()),
            payload,
        };
        log::debug!(
            "Added {} #{} at ({:.1}, {:.1}) size {:.0}x{:.0}",
            kind.name(),
            id,
            annotation.position.x,
            annotation.position.y,
            annotation.size.width,
            annotation.size.height
        );

        self.elements.push(annotation);
        self.touch();
        Ok(id)
    }

    /// Remove the annotation at `index`. Later elements shift down by one.
    pub fn remove(&mut self, index: usize) -> Result<Annotation, OverlayError> {
        if index >= self.elements.len() {
            return Err(OverlayError::out_of_range(index, self.elements.len()));
        }
        let removed = self.elements.remove(index);
        log::debug!("Removed {} #{} from index {}", removed.kind.name(), removed.id, index);
        self.touch();
        Ok(removed)
    }

    /// Remove an annotation by ID.
    pub fn remove_by_id(&mut self, id: AnnotationId) -> Result<Annotation, OverlayError> {
        let index = self
            .index_of(id)
            .ok_or(OverlayError::UnknownAnnotation(id))?;
        self.remove(index)
    }

    /// Replace the position of the annotation at `index`.
    pub fn update_position(
        &mut self,
        index: usize,
        position: DocPoint,
    ) -> Result<(), OverlayError> {
        let len = self.elements.len();
        let element = self
            .elements
            .get_mut(index)
            .ok_or(OverlayError::out_of_range(index, len))?;
        element.position = position;
        self.touch();
        Ok(())
    }

    /// Replace the position of an annotation by ID.
    pub fn update_position_by_id(
        &mut self,
        id: AnnotationId,
        position: DocPoint,
    ) -> Result<(), OverlayError> {
        let index = self
            .index_of(id)
            .ok_or(OverlayError::UnknownAnnotation(id))?;
        self.update_position(index, position)
    }

    /// Current annotations in paint order.
    pub fn list(&self) -> &[Annotation] {
        &self.elements
    }

    /// Get an annotation by index.
    pub fn get(&self, index: usize) -> Option<&Annotation> {
        self.elements.get(index)
    }

    /// Get an annotation by ID.
    pub fn get_by_id(&self, id: AnnotationId) -> Option<&Annotation> {
        self.elements.iter().find(|a| a.id == id)
    }

    /// Current index of the annotation with the given ID.
    pub fn index_of(&self, id: AnnotationId) -> Option<usize> {
        self.elements.iter().position(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Remove all annotations.
    pub fn clear(&mut self) {
        if !self.elements.is_empty() {
            self.elements.clear();
            self.touch();
        }
    }
}

impl Default for ElementStore {
    fn default() -> Self {
        Self::new()
    }
}
