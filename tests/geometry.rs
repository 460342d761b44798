use eframe_snip::geometry::hit_testing::{distance_to_segment, handle_at};
use eframe_snip::geometry::{
    CropRect, HandleDirection, apply_edge_snap, clamp_delta, clamp_move, rect_from_corners, resize_from_handle,
};
use egui::{Pos2, Rect, Vec2};

fn container() -> Vec2 {
    Vec2::new(800.0, 600.0)
}

fn sample_rect() -> CropRect {
    CropRect::new(100.0, 100.0, 200.0, 150.0)
}

#[test]
fn test_rect_from_corners_is_order_independent() {
    let bounds = Rect::from_min_size(Pos2::new(50.0, 20.0), container());
    let a = rect_from_corners(Pos2::new(70.0, 40.0), Pos2::new(170.0, 90.0), bounds);
    let b = rect_from_corners(Pos2::new(170.0, 90.0), Pos2::new(70.0, 40.0), bounds);

    assert_eq!(a, b);
    assert_eq!(a, CropRect::new(20.0, 20.0, 100.0, 50.0));
}

#[test]
fn test_edge_snap_welds_near_edges() {
    let rect = CropRect::new(12.0, 300.0, 770.0, 100.0);
    let snapped = apply_edge_snap(rect, container(), Some(20.0));

    assert_eq!(snapped.left, 0.0);
    assert_eq!(snapped.width, 800.0);
    // Far from the top and bottom edges
    assert_eq!(snapped.top, 300.0);
    assert_eq!(snapped.height, 100.0);
}

#[test]
fn test_edge_snap_disabled() {
    let rect = CropRect::new(2.0, 3.0, 795.0, 590.0);
    assert_eq!(apply_edge_snap(rect, container(), None), rect);
    assert_eq!(apply_edge_snap(rect, container(), Some(0.0)), rect);
}

#[test]
fn test_edge_snap_is_idempotent() {
    let rects = [
        CropRect::new(5.0, 5.0, 100.0, 100.0),
        CropRect::new(300.0, 200.0, 495.0, 390.0),
        CropRect::new(0.0, 0.0, 800.0, 600.0),
        CropRect::new(40.0, 19.0, 30.0, 30.0),
    ];
    for rect in rects {
        let once = apply_edge_snap(rect, container(), Some(20.0));
        let twice = apply_edge_snap(once, container(), Some(20.0));
        assert_eq!(once, twice, "snap of {rect:?} is not idempotent");
    }
}

#[test]
fn test_right_handle_keeps_left_edge_and_minimum() {
    let resized = resize_from_handle(
        HandleDirection::Right,
        sample_rect(),
        Vec2::new(-250.0, 0.0),
        container(),
        10.0,
    );

    assert_eq!(resized.width, 10.0);
    assert_eq!(resized.left, 100.0);
    assert_eq!(resized.top, 100.0);
    assert_eq!(resized.height, 150.0);
}

#[test]
fn test_left_handle_keeps_right_edge() {
    let origin = sample_rect();
    let resized = resize_from_handle(
        HandleDirection::Left,
        origin,
        Vec2::new(500.0, 40.0),
        container(),
        10.0,
    );

    assert_eq!(resized.right(), origin.right());
    assert_eq!(resized.width, 10.0);
    // A horizontal handle never touches the vertical extent
    assert_eq!(resized.top, origin.top);
    assert_eq!(resized.height, origin.height);
}

#[test]
fn test_corner_handle_clamps_to_container() {
    let resized = resize_from_handle(
        HandleDirection::BottomRight,
        sample_rect(),
        Vec2::new(1000.0, 1000.0),
        container(),
        10.0,
    );

    assert_eq!(resized.left, 100.0);
    assert_eq!(resized.top, 100.0);
    assert_eq!(resized.right(), 800.0);
    assert_eq!(resized.bottom(), 600.0);

    let resized = resize_from_handle(
        HandleDirection::TopLeft,
        sample_rect(),
        Vec2::new(-1000.0, -1000.0),
        container(),
        10.0,
    );
    assert_eq!(resized, CropRect::new(0.0, 0.0, 300.0, 250.0));
}

#[test]
fn test_resize_never_moves_the_opposite_edge() {
    let origin = sample_rect();
    let deltas = [
        Vec2::new(-500.0, -500.0),
        Vec2::new(500.0, 500.0),
        Vec2::new(-30.0, 70.0),
        Vec2::new(190.0, -140.0),
    ];
    for direction in HandleDirection::ALL {
        for delta in deltas {
            let resized = resize_from_handle(direction, origin, delta, container(), 10.0);
            assert!(resized.is_at_least(10.0), "{direction:?} {delta:?} -> {resized:?}");
            assert!(resized.fits_in(container()), "{direction:?} {delta:?} -> {resized:?}");
            if direction.moves_left() {
                assert_eq!(resized.right(), origin.right());
            }
            if direction.moves_right() {
                assert_eq!(resized.left, origin.left);
            }
            if direction.moves_top() {
                assert_eq!(resized.bottom(), origin.bottom());
            }
            if direction.moves_bottom() {
                assert_eq!(resized.top, origin.top);
            }
        }
    }
}

#[test]
fn test_resize_is_deterministic() {
    let a = resize_from_handle(
        HandleDirection::TopRight,
        sample_rect(),
        Vec2::new(33.0, -12.0),
        container(),
        10.0,
    );
    let b = resize_from_handle(
        HandleDirection::TopRight,
        sample_rect(),
        Vec2::new(33.0, -12.0),
        container(),
        10.0,
    );
    assert_eq!(a, b);
}

#[test]
fn test_clamp_move_stops_at_container_edge() {
    let rect = CropRect::new(0.0, 0.0, 200.0, 100.0);
    let moved = clamp_move(rect, Vec2::new(700.0, 0.0), container());
    assert_eq!(moved.left, 600.0);
    assert_eq!(moved.width, 200.0);

    let moved = clamp_move(rect, Vec2::new(-50.0, -50.0), container());
    assert_eq!(moved.left, 0.0);
    assert_eq!(moved.top, 0.0);
}

#[test]
fn test_clamp_delta_never_pushes_further_out() {
    // Fits inside: same limits as clamp_move
    let rect = CropRect::new(0.0, 0.0, 200.0, 100.0);
    assert_eq!(clamp_delta(rect, Vec2::new(700.0, 0.0), container()), Vec2::new(600.0, 0.0));

    // Already past the right edge
    let wide = CropRect::new(700.0, 10.0, 200.0, 20.0);
    assert_eq!(clamp_delta(wide, Vec2::ZERO, container()), Vec2::ZERO);
    assert_eq!(clamp_delta(wide, Vec2::new(30.0, 0.0), container()), Vec2::ZERO);
    assert_eq!(clamp_delta(wide, Vec2::new(-40.0, 5.0), container()), Vec2::new(-40.0, 5.0));
}

#[test]
fn test_handle_direction_names() {
    assert_eq!(HandleDirection::from_name("bottomright"), Some(HandleDirection::BottomRight));
    assert_eq!(HandleDirection::from_name("Left"), Some(HandleDirection::Left));
    assert_eq!(HandleDirection::from_name("middle"), None);
    for direction in HandleDirection::ALL {
        assert_eq!(HandleDirection::from_name(direction.as_str()), Some(direction));
    }
}

#[test]
fn test_handle_hit_testing_prefers_corners() {
    let rect = Rect::from_min_size(Pos2::new(100.0, 100.0), Vec2::new(200.0, 150.0));

    assert_eq!(handle_at(Pos2::new(101.0, 99.0), rect, 8.0), Some(HandleDirection::TopLeft));
    assert_eq!(handle_at(Pos2::new(200.0, 250.0), rect, 8.0), Some(HandleDirection::Bottom));
    assert_eq!(handle_at(Pos2::new(200.0, 175.0), rect, 8.0), None);
}

#[test]
fn test_distance_to_segment() {
    let a = Pos2::new(0.0, 0.0);
    let b = Pos2::new(10.0, 0.0);
    assert_eq!(distance_to_segment(Pos2::new(5.0, 3.0), a, b), 3.0);
    assert_eq!(distance_to_segment(Pos2::new(13.0, 4.0), a, b), 5.0);
    assert_eq!(distance_to_segment(Pos2::new(2.0, 2.0), a, a), 8.0_f32.sqrt());
}
