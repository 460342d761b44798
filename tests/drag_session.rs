use eframe_snip::input::{
    DragEvent, DragOptions, DragSession, InputEvent, InputHandler, KeyCommand, PointerEvent, Region,
};
use egui::{Modifiers, PointerButton, Pos2, Rect, Vec2};

fn node() -> Region {
    Region::Rect(Rect::from_min_size(Pos2::new(0.0, 0.0), Vec2::new(100.0, 100.0)))
}

fn p(x: f32, y: f32) -> Pos2 {
    Pos2::new(x, y)
}

#[test]
fn test_single_shot_session() {
    let mut session = DragSession::start(node(), DragOptions::default());

    assert_eq!(
        session.handle(&PointerEvent::down(p(10.0, 10.0))),
        Some(DragEvent::Down { start: p(10.0, 10.0) })
    );
    assert_eq!(
        session.handle(&PointerEvent::moved(p(20.0, 30.0))),
        Some(DragEvent::Move {
            start: p(10.0, 10.0),
            end: p(20.0, 30.0)
        })
    );
    assert_eq!(
        session.handle(&PointerEvent::up(p(25.0, 35.0))),
        Some(DragEvent::Up {
            start: p(10.0, 10.0),
            end: p(25.0, 35.0)
        })
    );

    // Not sticky: the session is done
    assert!(!session.is_listening());
    assert_eq!(session.handle(&PointerEvent::down(p(10.0, 10.0))), None);
}

#[test]
fn test_sticky_session_survives_up() {
    let mut session = DragSession::start(node(), DragOptions::sticky_anywhere());

    session.handle(&PointerEvent::down(p(10.0, 10.0)));
    session.handle(&PointerEvent::up(p(500.0, 500.0)));
    assert!(session.is_listening());
    assert!(!session.is_dragging());

    assert!(session.handle(&PointerEvent::down(p(50.0, 50.0))).is_some());
    assert_eq!(session.start_position(), Some(p(50.0, 50.0)));
}

#[test]
fn test_only_primary_button_starts_a_drag() {
    let mut session = DragSession::start(node(), DragOptions::default());
    let secondary = PointerEvent::Down {
        pos: p(10.0, 10.0),
        button: PointerButton::Secondary,
    };

    assert_eq!(session.handle(&secondary), None);
    assert!(!session.is_dragging());
}

#[test]
fn test_down_outside_node_is_ignored() {
    let mut session = DragSession::start(node(), DragOptions::default());
    assert_eq!(session.handle(&PointerEvent::down(p(150.0, 10.0))), None);
    assert_eq!(session.handle(&PointerEvent::moved(p(20.0, 20.0))), None);
}

#[test]
fn test_up_without_down_is_noop() {
    let mut session = DragSession::start(node(), DragOptions::default());
    assert_eq!(session.handle(&PointerEvent::up(p(10.0, 10.0))), None);
    assert!(session.is_listening());
}

#[test]
fn test_reentrant_down_is_ignored() {
    let mut session = DragSession::start(node(), DragOptions::sticky_anywhere());
    session.handle(&PointerEvent::down(p(10.0, 10.0)));

    assert_eq!(session.handle(&PointerEvent::down(p(40.0, 40.0))), None);
    assert_eq!(session.start_position(), Some(p(10.0, 10.0)));
}

#[test]
fn test_move_region_limits_moves() {
    let mut session = DragSession::start(node(), DragOptions::default());
    session.handle(&PointerEvent::down(p(10.0, 10.0)));

    // Move defaults to the node itself
    assert_eq!(session.handle(&PointerEvent::moved(p(300.0, 10.0))), None);

    let mut anywhere = DragSession::start(node(), DragOptions::once_anywhere());
    anywhere.handle(&PointerEvent::down(p(10.0, 10.0)));
    assert!(anywhere.handle(&PointerEvent::moved(p(300.0, 10.0))).is_some());
}

#[test]
fn test_stop_detaches_sticky_session() {
    let mut session = DragSession::start(node(), DragOptions::sticky_anywhere());
    session.handle(&PointerEvent::down(p(10.0, 10.0)));

    session.stop();
    session.stop();

    assert!(!session.is_listening());
    assert!(!session.is_dragging());
    assert_eq!(session.handle(&PointerEvent::moved(p(20.0, 20.0))), None);
    assert_eq!(session.handle(&PointerEvent::up(p(20.0, 20.0))), None);
    assert_eq!(session.handle(&PointerEvent::down(p(10.0, 10.0))), None);
}

#[test]
fn test_set_node_moves_the_hit_area() {
    let mut session = DragSession::start(node(), DragOptions::sticky_anywhere());
    session.set_node(Region::Rect(Rect::from_min_size(p(200.0, 200.0), Vec2::splat(10.0))));

    assert_eq!(session.handle(&PointerEvent::down(p(10.0, 10.0))), None);
    assert!(session.handle(&PointerEvent::down(p(205.0, 205.0))).is_some());
}

#[test]
fn test_drag_event_delta() {
    let event = DragEvent::Move {
        start: p(10.0, 10.0),
        end: p(15.0, 2.0),
    };
    assert_eq!(event.delta(), Vec2::new(5.0, -8.0));
    assert_eq!(DragEvent::Down { start: p(1.0, 1.0) }.delta(), Vec2::ZERO);
}

#[test]
fn test_input_handler_preserves_order() {
    let mut handler = InputHandler::new();
    let events = vec![
        egui::Event::PointerButton {
            pos: p(1.0, 1.0),
            button: PointerButton::Primary,
            pressed: true,
            modifiers: Modifiers::NONE,
        },
        egui::Event::PointerMoved(p(2.0, 2.0)),
        egui::Event::PointerMoved(p(2.0, 2.0)),
        egui::Event::PointerButton {
            pos: p(3.0, 3.0),
            button: PointerButton::Primary,
            pressed: false,
            modifiers: Modifiers::NONE,
        },
        egui::Event::Key {
            key: egui::Key::Escape,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: Modifiers::NONE,
        },
        egui::Event::Text("a".to_owned()),
    ];

    let stream = handler.process_events(&events);

    assert_eq!(
        stream,
        vec![
            InputEvent::Pointer(PointerEvent::down(p(1.0, 1.0))),
            InputEvent::Pointer(PointerEvent::moved(p(2.0, 2.0))),
            InputEvent::Pointer(PointerEvent::up(p(3.0, 3.0))),
            InputEvent::Key(KeyCommand::Cancel),
            InputEvent::Text("a".to_owned()),
        ]
    );
    assert_eq!(handler.last_pointer_pos(), Some(p(3.0, 3.0)));
}
