//! Pointer-driven dragging of annotations.
//!
//! The controller is a two-state machine: `Idle` and `Dragging`. A primary
//! button press over an annotation starts a drag; every move re-centers the
//! annotation on the pointer; release or leaving the surface ends the drag,
//! keeping whatever position was last committed.
//!
//! The dragged annotation is tracked by its stable ID and resolved to an
//! index on every move, so removing elements mid-drag can never redirect the
//! drag to a different annotation. If the dragged annotation itself is gone,
//! the controller drops back to `Idle`.

use crate::hit_test::HitTester;
use crate::model::{AnnotationId, DocPoint, ScreenPoint};
use crate::store::ElementStore;
use crate::transform::CoordinateTransform;

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Pointer events delivered by the host surface, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Button pressed.
    Down {
        position: ScreenPoint,
        button: PointerButton,
    },
    /// Pointer moved.
    Move { position: ScreenPoint },
    /// Button released.
    Up,
    /// Pointer left the surface.
    Leave,
}

/// Current drag state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// The annotation being dragged
        id: AnnotationId,
        /// Its index when last resolved (informational only)
        index: usize,
    },
}

/// What a pointer event did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// A drag started on the annotation at `index`.
    Started { id: AnnotationId, index: usize },
    /// The dragged annotation was moved to `position`.
    Moved {
        id: AnnotationId,
        position: DocPoint,
    },
    /// The pointer was released.
    Ended { id: AnnotationId },
    /// The pointer left the surface.
    Cancelled { id: AnnotationId },
    /// The dragged annotation no longer exists; the drag was abandoned.
    Lost { id: AnnotationId },
    /// Nothing happened.
    Ignored,
}

impl DragOutcome {
    /// Whether the store was modified.
    pub fn moved(&self) -> bool {
        matches!(self, DragOutcome::Moved { .. })
    }
}

/// Drives pointer events into annotation selection and movement.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// ID of the annotation being dragged, if any.
    pub fn dragged(&self) -> Option<AnnotationId> {
        match self.state {
            DragState::Dragging { id, .. } => Some(id),
            DragState::Idle => None,
        }
    }

    /// Dispatch a pointer event.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        store: &mut ElementStore,
        transform: CoordinateTransform,
    ) -> DragOutcome {
        match event {
            // Any button grabs, as with a plain mouse-down
            PointerEvent::Down { position, .. } => self.pointer_down(position, store, transform),
            PointerEvent::Move { position } => self.pointer_move(position, store, transform),
            PointerEvent::Up => self.pointer_up(),
            PointerEvent::Leave => self.pointer_leave(),
        }
    }

    /// Start dragging the topmost annotation under `position`, if any.
    pub fn pointer_down(
        &mut self,
        position: ScreenPoint,
        store: &ElementStore,
        transform: CoordinateTransform,
    ) -> DragOutcome {
        // A lost pointer-up would otherwise leave the previous drag running
        if let Some(id) = self.dragged() {
            log::warn!("Pointer down while dragging #{} - ending previous drag", id);
            self.state = DragState::Idle;
        }

        let tester = HitTester::new(store.list(), transform);
        match tester.hit_test(position) {
            Some(index) => {
                let id = store.list()[index].id;
                self.state = DragState::Dragging { id, index };
                log::debug!(
                    "Drag started on #{} (index {}) at ({:.1}, {:.1})",
                    id,
                    index,
                    position.x,
                    position.y
                );
                DragOutcome::Started { id, index }
            }
            None => DragOutcome::Ignored,
        }
    }

    /// Re-center the dragged annotation on `position`.
    pub fn pointer_move(
        &mut self,
        position: ScreenPoint,
        store: &mut ElementStore,
        transform: CoordinateTransform,
    ) -> DragOutcome {
        let DragState::Dragging { id, .. } = self.state else {
            return DragOutcome::Ignored;
        };

        let Some(index) = store.index_of(id) else {
            log::warn!("Dragged annotation #{} was removed - abandoning drag", id);
            self.state = DragState::Idle;
            return DragOutcome::Lost { id };
        };

        let size = store.list()[index].size;
        let new_position = transform.to_document(position).centered(size);

        if let Err(e) = store.update_position(index, new_position) {
            log::warn!("Failed to move #{}: {} - abandoning drag", id, e);
            self.state = DragState::Idle;
            return DragOutcome::Lost { id };
        }

        self.state = DragState::Dragging { id, index };
        DragOutcome::Moved {
            id,
            position: new_position,
        }
    }

    /// End the drag on button release.
    pub fn pointer_up(&mut self) -> DragOutcome {
        match self.dragged() {
            Some(id) => {
                self.state = DragState::Idle;
                log::debug!("Drag ended on #{}", id);
                DragOutcome::Ended { id }
            }
            None => DragOutcome::Ignored,
        }
    }

    /// End the drag when the pointer leaves the surface. The position is not reverted.
    pub fn pointer_leave(&mut self) -> DragOutcome {
        match self.dragged() {
            Some(id) => {
                self.state = DragState::Idle;
                log::debug!("Pointer left surface, drag on #{} cancelled", id);
                DragOutcome::Cancelled { id }
            }
            None => DragOutcome::Ignored,
        }
    }
}
