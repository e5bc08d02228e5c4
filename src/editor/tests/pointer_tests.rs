//! Pointer routing through the session.

use super::{CLEAR, RED, pixel, session};
use crate::drag::{DragOutcome, DragState, PointerButton, PointerEvent};
use crate::model::{DocPoint, ScreenPoint};

fn down(x: f32, y: f32) -> PointerEvent {
    PointerEvent::Down {
        position: ScreenPoint::new(x, y),
        button: PointerButton::Primary,
    }
}

fn moved(x: f32, y: f32) -> PointerEvent {
    PointerEvent::Move {
        position: ScreenPoint::new(x, y),
    }
}

#[test]
fn test_drag_redraws_overlay() {
    let mut session = session();
    session.save_signature().unwrap();
    session.add_signature().unwrap();
    let generation = session.render_stats().generation;

    assert!(matches!(
        session.handle_pointer(down(150.0, 100.0)),
        DragOutcome::Started { index: 0, .. }
    ));
    // Pressing does not move anything
    assert_eq!(session.render_stats().generation, generation);

    assert!(session.handle_pointer(moved(200.0, 250.0)).moved());
    assert_eq!(session.elements()[0].position, DocPoint::new(100.0, 200.0));
    assert!(session.render_stats().generation > generation);

    // Old area cleared, new area drawn
    assert_eq!(pixel(&session, 60, 60), CLEAR);
    assert_eq!(pixel(&session, 110, 210), RED);

    assert!(matches!(session.handle_pointer(PointerEvent::Up), DragOutcome::Ended { .. }));
    assert!(!session.drag().is_dragging());
}

#[test]
fn test_drag_at_zoom() {
    let mut session = session();
    session.save_signature().unwrap();
    session.add_signature().unwrap();
    session.set_scale(2.0);

    // Screen rect is (100, 100) 400x200
    session.handle_pointer(down(300.0, 200.0));
    session.handle_pointer(moved(400.0, 400.0));

    // Center lands on (200, 200) in document space
    assert_eq!(session.elements()[0].position, DocPoint::new(100.0, 150.0));
    assert_eq!(pixel(&session, 210, 310), RED);
}

#[test]
fn test_click_on_empty_space() {
    let mut session = session();
    session.save_signature().unwrap();
    session.add_signature().unwrap();

    assert_eq!(session.handle_pointer(down(10.0, 10.0)), DragOutcome::Ignored);
    assert_eq!(session.handle_pointer(moved(100.0, 100.0)), DragOutcome::Ignored);
    assert_eq!(session.elements()[0].position, DocPoint::new(50.0, 50.0));
}

#[test]
fn test_topmost_element_is_grabbed() {
    let mut session = session();
    session.save_signature().unwrap();
    session.add_signature().unwrap();
    let qr = session.add_qr_code().unwrap();

    session.handle_pointer(down(60.0, 60.0));
    assert_eq!(session.drag().dragged(), Some(qr));
}

#[test]
fn test_remove_during_drag() {
    let mut session = session();
    session.save_signature().unwrap();
    let first = session.add_signature().unwrap();
    session.add_qr_code().unwrap();

    session.handle_pointer(down(200.0, 120.0));
    assert_eq!(session.drag().dragged(), Some(first));

    session.remove(0).unwrap();
    assert!(matches!(
        session.handle_pointer(moved(250.0, 250.0)),
        DragOutcome::Lost { .. }
    ));
    assert_eq!(session.drag().state(), DragState::Idle);
    // The QR code now at index 0 was not moved
    assert_eq!(session.elements()[0].position, DocPoint::new(50.0, 50.0));
}

#[test]
fn test_leave_keeps_last_position() {
    let mut session = session();
    session.add_qr_code().unwrap();

    session.handle_pointer(down(100.0, 100.0));
    session.handle_pointer(moved(150.0, 150.0));
    assert!(matches!(
        session.handle_pointer(PointerEvent::Leave),
        DragOutcome::Cancelled { .. }
    ));
    assert_eq!(session.elements()[0].position, DocPoint::new(100.0, 100.0));
}
