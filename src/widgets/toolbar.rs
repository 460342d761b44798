use egui::{Color32, Id, Pos2, Rect, Ui, Vec2};

use super::tool_button::ToolButton;
use crate::annotation::ToolKind;
use crate::config::SnipOptions;

const SPACING: f32 = 4.0;
const PADDING: f32 = 4.0;
/// Gap between the crop rectangle and the toolbar.
const GAP: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    Toggle(ToolKind),
    Save,
    Cancel,
    Confirm,
}

#[derive(Debug, Clone, Copy)]
enum Button {
    Tool(ToolKind),
    Save,
    Cancel,
    Confirm,
}

/// The row of tool and action buttons attached to the crop rectangle.
pub struct Toolbar<'a> {
    options: &'a SnipOptions,
    active: Option<ToolKind>,
}

impl<'a> Toolbar<'a> {
    pub fn new(options: &'a SnipOptions, active: Option<ToolKind>) -> Self {
        Self { options, active }
    }

    fn buttons(&self) -> Vec<Button> {
        let mut buttons: Vec<Button> = ToolKind::ALL.into_iter().map(Button::Tool).collect();
        if self.options.save_btn {
            buttons.push(Button::Save);
        }
        buttons.push(Button::Cancel);
        buttons.push(Button::Confirm);
        buttons
    }

    pub fn size(&self) -> Vec2 {
        let count = self.buttons().len() as f32;
        let btn = self.options.btn_size;
        Vec2::new(
            count * btn + (count - 1.0) * SPACING + 2.0 * PADDING,
            btn + 2.0 * PADDING,
        )
    }

    /// Where the toolbar goes for a crop rectangle `crop` inside `container`, both in screen space.
    ///
    /// Right-aligned below the rectangle; above it when there is no room
    /// below, and inside its bottom edge when there is no room either way.
    pub fn layout(&self, crop: Rect, container: Rect) -> Rect {
        let size = self.size();
        let x = (crop.right() - size.x).max(container.left());
        let below = crop.bottom() + GAP;
        let above = crop.top() - GAP - size.y;
        let y = if below + size.y <= container.bottom() {
            below
        } else if above >= container.top() {
            above
        } else {
            (crop.bottom() - GAP - size.y).max(container.top())
        };
        Rect::from_min_size(Pos2::new(x, y), size)
    }

    /// Draws the toolbar at `rect` and returns the clicked action, if any.
    pub fn show(&self, ui: &mut Ui, rect: Rect, id: Id) -> Option<ToolbarAction> {
        ui.painter()
            .rect_filled(rect, 4.0, Color32::from_black_alpha(200));

        let btn = Vec2::splat(self.options.btn_size);
        let mut min = rect.min + Vec2::splat(PADDING);
        let mut action = None;

        for (index, button) in self.buttons().into_iter().enumerate() {
            let (icon, selected, color, on_click) = match button {
                Button::Tool(tool) => (
                    tool.icon(),
                    self.active == Some(tool),
                    self.options.btn_color,
                    ToolbarAction::Toggle(tool),
                ),
                Button::Save => ("💾", false, self.options.btn_color, ToolbarAction::Save),
                Button::Cancel => ("✖", false, self.options.cancel_color, ToolbarAction::Cancel),
                Button::Confirm => ("✔", false, self.options.ok_color, ToolbarAction::Confirm),
            };
            let button_rect = Rect::from_min_size(min, btn);
            let response =
                ToolButton::new(icon, selected, color).show(ui, button_rect, id.with(index));
            if response.clicked() {
                action = Some(on_click);
            }
            min.x += btn.x + SPACING;
        }

        action
    }
}
