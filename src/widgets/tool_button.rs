use egui::{Align2, Color32, FontId, Id, Rect, Response, Sense, Stroke, Ui};

/// A square icon button on the toolbar.
pub struct ToolButton {
    pub icon: &'static str,
    pub selected: bool,
    /// Icon color.
    pub color: Color32,
}

impl ToolButton {
    pub fn new(icon: &'static str, selected: bool, color: Color32) -> Self {
        Self {
            icon,
            selected,
            color,
        }
    }

    /// Paints the button into `rect` and returns its click response.
    pub fn show(&self, ui: &mut Ui, rect: Rect, id: Id) -> Response {
        let response = ui.interact(rect, id, Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                Color32::from_rgb(100, 181, 246)
            } else if response.hovered() {
                Color32::from_gray(70)
            } else {
                Color32::from_gray(45)
            };
            ui.painter().rect_filled(rect, 4.0, bg_color);

            let text_color = if self.selected {
                Color32::BLACK
            } else {
                self.color
            };
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                self.icon,
                FontId::proportional(rect.height() * 0.7),
                text_color,
            );

            if self.selected {
                ui.painter()
                    .rect_stroke(rect, 4.0, Stroke::new(2.0, Color32::from_rgb(33, 150, 243)));
            }
        }

        response
    }
}
