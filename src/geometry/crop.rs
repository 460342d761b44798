use egui::{Pos2, Rect, Vec2};

use super::{CropRect, HandleDirection};

/// `value` limited to `[lo, hi]`; an empty range collapses onto `lo`.
fn limit(value: f32, lo: f32, hi: f32) -> f32 {
    value.min(hi).max(lo)
}

/// Builds the rectangle spanned by two screen points, relative to `bounds`.
pub fn rect_from_corners(p1: Pos2, p2: Pos2, bounds: Rect) -> CropRect {
    CropRect {
        left: p1.x.min(p2.x) - bounds.min.x,
        top: p1.y.min(p2.y) - bounds.min.y,
        width: (p2.x - p1.x).abs(),
        height: (p2.y - p1.y).abs(),
    }
}

/// Welds edges that come within `threshold` of the container edge onto it.
///
/// `None` or a non-positive threshold leaves the rectangle untouched.
pub fn apply_edge_snap(rect: CropRect, container: Vec2, threshold: Option<f32>) -> CropRect {
    let Some(threshold) = threshold.filter(|t| *t > 0.0) else {
        return rect;
    };

    let mut snapped = rect;
    if snapped.left < threshold {
        snapped.width += snapped.left;
        snapped.left = 0.0;
    }
    if snapped.left + snapped.width + threshold > container.x {
        snapped.width = container.x - snapped.left;
    }
    if snapped.top < threshold {
        snapped.height += snapped.top;
        snapped.top = 0.0;
    }
    if snapped.top + snapped.height + threshold > container.y {
        snapped.height = container.y - snapped.top;
    }
    snapped
}

/// Resizes `origin` by dragging the handle at `direction` by `delta`.
///
/// The edge opposite the handle stays put, the dragged dimension never drops
/// below `min_size` and the result never leaves the container.
pub fn resize_from_handle(
    direction: HandleDirection,
    origin: CropRect,
    delta: Vec2,
    container: Vec2,
    min_size: f32,
) -> CropRect {
    let min_w = min_size.min(container.x);
    let min_h = min_size.min(container.y);
    let mut rect = origin;

    if direction.moves_left() {
        let right = origin.right();
        let left = limit(origin.left + delta.x, 0.0, right - min_w);
        rect.left = left;
        rect.width = right - left;
    } else if direction.moves_right() {
        let right = limit(origin.right() + delta.x, origin.left + min_w, container.x);
        rect.width = right - origin.left;
    }

    if direction.moves_top() {
        let bottom = origin.bottom();
        let top = limit(origin.top + delta.y, 0.0, bottom - min_h);
        rect.top = top;
        rect.height = bottom - top;
    } else if direction.moves_bottom() {
        let bottom = limit(origin.bottom() + delta.y, origin.top + min_h, container.y);
        rect.height = bottom - origin.top;
    }

    rect
}

/// Limits `delta` so `rect` never ends up further outside the container
/// than it already is. Parts already past an edge may stay there.
pub fn clamp_delta(rect: CropRect, delta: Vec2, container: Vec2) -> Vec2 {
    let axis = |delta: f32, start: f32, end: f32, limit: f32| {
        let min = (-start).min(0.0);
        let max = (limit - end).max(0.0);
        delta.clamp(min, max)
    };
    Vec2::new(
        axis(delta.x, rect.left, rect.left + rect.width, container.x),
        axis(delta.y, rect.top, rect.top + rect.height, container.y),
    )
}

/// Translates `rect` by `delta` without letting it leave the container.
pub fn clamp_move(rect: CropRect, delta: Vec2, container: Vec2) -> CropRect {
    let max_left = (container.x - rect.width).max(0.0);
    let max_top = (container.y - rect.height).max(0.0);
    CropRect {
        left: limit(rect.left + delta.x, 0.0, max_left),
        top: limit(rect.top + delta.y, 0.0, max_top),
        ..rect
    }
}
