use eframe_snip::config::SnipOptions;
use eframe_snip::geometry::{CropRect, HandleDirection};
use eframe_snip::input::PointerEvent;
use eframe_snip::selection::{SelectionController, SelectionEffect, SelectionState};
use egui::{Pos2, Rect, Vec2};

fn container() -> Rect {
    Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0))
}

fn p(x: f32, y: f32) -> Pos2 {
    Pos2::new(x, y)
}

fn drag(controller: &mut SelectionController, from: Pos2, to: Pos2) {
    controller.handle_pointer(&PointerEvent::down(from));
    controller.handle_pointer(&PointerEvent::moved(to));
    controller.handle_pointer(&PointerEvent::up(to));
}

fn selected_controller() -> SelectionController {
    let mut controller = SelectionController::new(container(), &SnipOptions::default());
    drag(&mut controller, p(100.0, 100.0), p(300.0, 250.0));
    controller.take_effects();
    controller
}

#[test]
fn test_starts_idle() {
    let controller = SelectionController::new(container(), &SnipOptions::default());
    assert_eq!(controller.state(), SelectionState::Idle);
    assert!(!controller.has_selection());
    assert!(controller.handle_rects().is_empty());
}

#[test]
fn test_rubber_band_selection() {
    let mut controller = SelectionController::new(container(), &SnipOptions::default());

    controller.handle_pointer(&PointerEvent::down(p(100.0, 100.0)));
    assert_eq!(controller.state(), SelectionState::DraggingNew);

    controller.handle_pointer(&PointerEvent::moved(p(200.0, 180.0)));
    assert_eq!(controller.rect(), CropRect::new(100.0, 100.0, 100.0, 80.0));
    assert_eq!(controller.readout().map(|r| r.text.as_str()), Some("100 × 80"));

    controller.handle_pointer(&PointerEvent::up(p(300.0, 250.0)));
    assert_eq!(controller.state(), SelectionState::Selected);
    assert_eq!(controller.rect(), CropRect::new(100.0, 100.0, 200.0, 150.0));
    assert_eq!(controller.handle_rects().len(), 8);
    assert_eq!(controller.take_effects(), vec![SelectionEffect::Regenerate]);
}

#[test]
fn test_tiny_selection_snips_full() {
    let mut controller = SelectionController::new(container(), &SnipOptions::default());
    drag(&mut controller, p(10.0, 10.0), p(15.0, 12.0));

    assert_eq!(controller.rect(), CropRect::new(0.0, 0.0, 800.0, 600.0));
    assert_eq!(controller.state(), SelectionState::Selected);
}

#[test]
fn test_selection_welds_to_edges() {
    let mut controller = SelectionController::new(container(), &SnipOptions::default());
    drag(&mut controller, p(5.0, 8.0), p(300.0, 300.0));
    assert_eq!(controller.rect(), CropRect::new(0.0, 0.0, 300.0, 300.0));

    let options = SnipOptions {
        auto_weld: None,
        ..SnipOptions::default()
    };
    let mut controller = SelectionController::new(container(), &options);
    drag(&mut controller, p(5.0, 8.0), p(300.0, 300.0));
    assert_eq!(controller.rect(), CropRect::new(5.0, 8.0, 295.0, 292.0));
}

#[test]
fn test_auto_full_skips_rubber_band() {
    let options = SnipOptions {
        auto_full: true,
        ..SnipOptions::default()
    };
    let mut controller = SelectionController::new(container(), &options);

    assert_eq!(controller.state(), SelectionState::Selected);
    assert_eq!(controller.rect(), CropRect::new(0.0, 0.0, 800.0, 600.0));
    assert_eq!(controller.take_effects(), vec![SelectionEffect::Regenerate]);
}

#[test]
fn test_right_handle_drag() {
    let mut controller = selected_controller();

    controller.handle_pointer(&PointerEvent::down(p(300.0, 175.0)));
    assert!(matches!(
        controller.state(),
        SelectionState::DraggingResize {
            direction: HandleDirection::Right,
            ..
        }
    ));
    assert_eq!(controller.take_effects(), vec![SelectionEffect::Invalidate]);

    controller.handle_pointer(&PointerEvent::moved(p(50.0, 175.0)));
    assert_eq!(controller.rect().width, 10.0);
    assert_eq!(controller.rect().left, 100.0);

    controller.handle_pointer(&PointerEvent::up(p(50.0, 175.0)));
    assert_eq!(controller.state(), SelectionState::Selected);
    assert_eq!(controller.take_effects(), vec![SelectionEffect::Regenerate]);
}

#[test]
fn test_handles_follow_the_rectangle() {
    let mut controller = selected_controller();
    drag(&mut controller, p(300.0, 250.0), p(400.0, 300.0));
    assert_eq!(controller.rect(), CropRect::new(100.0, 100.0, 300.0, 200.0));

    let (_, bottom_right) = controller
        .handle_rects()
        .into_iter()
        .find(|(dir, _)| *dir == HandleDirection::BottomRight)
        .unwrap();
    assert_eq!(bottom_right.center(), p(400.0, 300.0));

    // The moved handle is grabbable at its new position
    drag(&mut controller, p(400.0, 300.0), p(410.0, 310.0));
    assert_eq!(controller.rect(), CropRect::new(100.0, 100.0, 310.0, 210.0));
}

#[test]
fn test_move_drag_is_clamped() {
    let mut controller = selected_controller();

    controller.handle_pointer(&PointerEvent::down(p(200.0, 175.0)));
    assert!(matches!(controller.state(), SelectionState::DraggingMove { .. }));

    controller.handle_pointer(&PointerEvent::moved(p(900.0, 175.0)));
    assert_eq!(controller.rect().left, 600.0);
    assert_eq!(controller.rect().width, 200.0);

    controller.handle_pointer(&PointerEvent::up(p(900.0, 175.0)));
    assert_eq!(controller.rect(), CropRect::new(600.0, 100.0, 200.0, 150.0));
    assert!(controller.rect().fits_in(controller.container_size()));
}

#[test]
fn test_rectangle_stays_in_container_under_any_drag() {
    let mut controller = selected_controller();
    let targets = [p(-300.0, -300.0), p(2000.0, 40.0), p(10.0, 5000.0), p(400.0, 300.0)];
    for target in targets {
        let grab = controller.screen_rect().center();
        drag(&mut controller, grab, target);
        assert!(controller.rect().fits_in(controller.container_size()));
        assert!(controller.rect().is_at_least(10.0));
    }
}

#[test]
fn test_freeze_stops_all_sessions() {
    let mut controller = selected_controller();
    let before = controller.rect();

    controller.freeze();
    assert!(controller.is_frozen());
    assert!(controller.handle_rects().is_empty());

    assert!(!controller.handle_pointer(&PointerEvent::down(p(200.0, 175.0))));
    assert!(!controller.handle_pointer(&PointerEvent::moved(p(400.0, 175.0))));
    assert_eq!(controller.rect(), before);
}

#[test]
fn test_readout_moves_inside_at_top_edge() {
    let mut controller = SelectionController::new(container(), &SnipOptions::default());
    drag(&mut controller, p(100.0, 0.0), p(300.0, 100.0));

    let readout = controller.readout().unwrap();
    assert_eq!(readout.text, "200 × 100");
    assert!(readout.anchor.y >= 0.0);

    let controller = selected_controller();
    let readout = controller.readout().unwrap();
    assert_eq!(readout.anchor, p(100.0, 80.0));
}

#[test]
fn test_offset_container_uses_local_coordinates() {
    let host = Rect::from_min_size(p(50.0, 40.0), Vec2::new(400.0, 300.0));
    let mut controller = SelectionController::new(host, &SnipOptions::default());
    drag(&mut controller, p(150.0, 140.0), p(250.0, 240.0));

    assert_eq!(controller.rect(), CropRect::new(100.0, 100.0, 100.0, 100.0));
    assert_eq!(
        controller.screen_rect(),
        Rect::from_min_size(p(150.0, 140.0), Vec2::splat(100.0))
    );
}
