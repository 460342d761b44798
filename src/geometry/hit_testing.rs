use egui::{Pos2, Rect, Vec2};

use super::HandleDirection;

/// Side length of the square resize handles, in points.
pub const RESIZE_HANDLE_SIZE: f32 = 8.0;
/// Extra slop around a handle that still counts as a hit.
pub const HANDLE_HIT_PADDING: f32 = 4.0;

/// Interactive area of the handle at `direction` on `rect`.
pub fn handle_rect(direction: HandleDirection, rect: Rect, handle_size: f32) -> Rect {
    Rect::from_center_size(
        direction.anchor(rect),
        Vec2::splat(handle_size + 2.0 * HANDLE_HIT_PADDING),
    )
}

/// Returns the handle under `pos`, corners first so they win where they overlap edges.
pub fn handle_at(pos: Pos2, rect: Rect, handle_size: f32) -> Option<HandleDirection> {
    let order = [
        HandleDirection::TopLeft,
        HandleDirection::TopRight,
        HandleDirection::BottomLeft,
        HandleDirection::BottomRight,
        HandleDirection::Top,
        HandleDirection::Bottom,
        HandleDirection::Left,
        HandleDirection::Right,
    ];
    order
        .into_iter()
        .find(|dir| handle_rect(*dir, rect, handle_size).contains(pos))
}

/// Distance from a point to a line segment, used to hit-test strokes and arrows.
pub fn distance_to_segment(point: Pos2, start: Pos2, end: Pos2) -> f32 {
    let line = end - start;
    let len_sq = line.length_sq();
    if len_sq == 0.0 {
        return point.distance(start);
    }
    let t = ((point - start).dot(line) / len_sq).clamp(0.0, 1.0);
    point.distance(start + line * t)
}

/// Bounding box of a point list grown by `padding`.
pub fn bounds_of(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }
    let mut rect = Rect::from_min_max(points[0], points[0]);
    for point in &points[1..] {
        rect.extend_with(*point);
    }
    rect.expand(padding)
}
