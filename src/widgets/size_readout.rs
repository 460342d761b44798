use egui::{Color32, FontId, Painter, Pos2, Vec2};

use crate::selection::SizeReadout;

/// Paints the `width × height` label; `origin` is the container's top-left on screen.
pub fn paint_size_readout(painter: &Painter, readout: &SizeReadout, origin: Pos2) {
    let anchor = origin + readout.anchor.to_vec2();
    let galley = painter.layout_no_wrap(
        readout.text.clone(),
        FontId::monospace(12.0),
        Color32::WHITE,
    );
    let background = egui::Rect::from_min_size(anchor, galley.size() + Vec2::new(8.0, 4.0));
    painter.rect_filled(background, 2.0, Color32::from_black_alpha(160));
    painter.galley(anchor + Vec2::new(4.0, 2.0), galley, Color32::WHITE);
}
