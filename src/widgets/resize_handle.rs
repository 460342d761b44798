use egui::{Color32, Id, Painter, Pos2, Rect, Response, Sense, Stroke, Ui, Vec2};

use crate::geometry::HandleDirection;
use crate::geometry::hit_testing::HANDLE_HIT_PADDING;

const HANDLE_FILL: Color32 = Color32::from_rgb(30, 120, 255);

/// One of the eight square handles on the crop rectangle.
pub struct ResizeHandle {
    direction: HandleDirection,
    position: Pos2,
    size: f32,
}

impl ResizeHandle {
    pub fn new(direction: HandleDirection, position: Pos2, size: f32) -> Self {
        Self {
            direction,
            position,
            size,
        }
    }

    /// The handle for `direction` on the screen rect `rect`.
    pub fn on_rect(direction: HandleDirection, rect: Rect, size: f32) -> Self {
        Self::new(direction, direction.anchor(rect), size)
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.position, Vec2::splat(self.size))
    }

    pub fn paint(&self, painter: &Painter) {
        let rect = self.rect();
        painter.rect_filled(rect, 1.0, HANDLE_FILL);
        painter.rect_stroke(rect, 1.0, Stroke::new(1.0, Color32::WHITE));
    }

    /// Paints the handle and reports hover so the resize cursor shows.
    ///
    /// Dragging is driven by the selection controller, not by this response.
    pub fn show(&self, ui: &mut Ui, owner: Id) -> Response {
        self.paint(ui.painter());
        let hit = Rect::from_center_size(
            self.position,
            Vec2::splat(self.size + 2.0 * HANDLE_HIT_PADDING),
        );
        ui.interact(hit, owner.with(("resize_handle", self.direction.as_str())), Sense::hover())
            .on_hover_cursor(self.direction.cursor_icon())
    }
}
