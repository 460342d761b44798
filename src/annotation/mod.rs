//! Drawing on the finalized crop region.
//!
//! [`AnnotationSession`] owns the drawing surface and the active tool. Tools are
//! mutually exclusive; switching always pauses the old tool before activating
//! the new one.

use egui::{Pos2, Rect};
use image::RgbaImage;

use crate::config::{LineStyle, MosaicStyle, SnipOptions, TextStyle};
use crate::input::{DragEvent, DragOptions, DragSession, PointerEvent, Region};

mod canvas;
pub mod mosaic;
pub mod object;
mod surface;

pub use canvas::ObjectCanvas;
pub use object::{Annotation, AnnotationKind, Brush, Controls, ObjectId};
pub use surface::{DrawingSurface, SurfaceCursor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Pen,
    Mosaic,
    Text,
    Rectangle,
    Ellipse,
    Arrow,
}

impl ToolKind {
    /// Toolbar order.
    pub const ALL: [ToolKind; 6] = [
        ToolKind::Pen,
        ToolKind::Mosaic,
        ToolKind::Text,
        ToolKind::Rectangle,
        ToolKind::Ellipse,
        ToolKind::Arrow,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Pen => "pen",
            ToolKind::Mosaic => "mosaic",
            ToolKind::Text => "text",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Ellipse => "ellipse",
            ToolKind::Arrow => "arrow",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ToolKind::Pen => "✏",
            ToolKind::Mosaic => "▦",
            ToolKind::Text => "T",
            ToolKind::Rectangle => "⬜",
            ToolKind::Ellipse => "⭕",
            ToolKind::Arrow => "↗",
        }
    }

    /// The object kind a drag with this tool produces, for the drag-to-draw shapes.
    pub fn shape_kind(&self) -> Option<AnnotationKind> {
        match self {
            ToolKind::Rectangle => Some(AnnotationKind::Rectangle),
            ToolKind::Ellipse => Some(AnnotationKind::Ellipse),
            ToolKind::Arrow => Some(AnnotationKind::Arrow),
            ToolKind::Pen | ToolKind::Mosaic | ToolKind::Text => None,
        }
    }
}

/// Styles new objects are created with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolStyles {
    pub pen: LineStyle,
    pub shape: LineStyle,
    pub arrow_head: f32,
    pub text: TextStyle,
    pub mosaic: MosaicStyle,
}

impl From<&SnipOptions> for ToolStyles {
    fn from(options: &SnipOptions) -> Self {
        Self {
            pen: options.pen,
            shape: options.shape,
            arrow_head: options.arrow_head,
            text: options.text,
            mosaic: options.mosaic,
        }
    }
}

impl Default for ToolStyles {
    fn default() -> Self {
        Self::from(&SnipOptions::default())
    }
}

/// A shape being dragged out.
#[derive(Debug)]
struct ShapeDraft {
    kind: AnnotationKind,
    session: DragSession,
    object: Option<ObjectId>,
}

#[derive(Debug)]
pub struct AnnotationSession<S: DrawingSurface> {
    surface: S,
    /// Screen rect of the crop region the surface covers.
    region: Rect,
    styles: ToolStyles,
    active: Option<ToolKind>,
    draft: Option<ShapeDraft>,
}

impl<S: DrawingSurface> AnnotationSession<S> {
    /// Seeds `surface` with the cropped pixels; no tool is active yet.
    pub fn start(mut surface: S, background: RgbaImage, region: Rect, styles: ToolStyles) -> Self {
        log::info!(
            "annotation started on {}x{} crop",
            background.width(),
            background.height()
        );
        surface.set_background(background);
        surface.set_selectable(true);
        surface.set_cursor(SurfaceCursor::Default);
        Self {
            surface,
            region,
            styles,
            active: None,
            draft: None,
        }
    }

    pub fn active_tool(&self) -> Option<ToolKind> {
        self.active
    }

    pub fn region(&self) -> Rect {
        self.region
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The only way the active tool changes.
    pub fn set_active_tool(&mut self, tool: Option<ToolKind>) {
        if self.active == tool {
            return;
        }
        if let Some(previous) = self.active.take() {
            self.pause(previous);
        }
        if let Some(next) = tool {
            self.activate(next);
        }
        self.active = tool;
        log::info!(
            "active tool: {}",
            tool.map(|t| t.name()).unwrap_or("none")
        );
    }

    /// Activates `tool`, or switches it off when it already is the active one.
    pub fn toggle_tool(&mut self, tool: ToolKind) {
        if self.active == Some(tool) {
            self.set_active_tool(None);
        } else {
            self.set_active_tool(Some(tool));
        }
    }

    fn activate(&mut self, tool: ToolKind) {
        match tool {
            ToolKind::Pen => self.surface.set_brush(Some(Brush::Pen(self.styles.pen))),
            ToolKind::Mosaic => self
                .surface
                .set_brush(Some(Brush::Mosaic(self.styles.mosaic))),
            ToolKind::Text => {
                self.surface.select(None);
                self.surface.set_selectable(false);
                self.surface.set_cursor(SurfaceCursor::Text);
            }
            ToolKind::Rectangle | ToolKind::Ellipse | ToolKind::Arrow => {
                self.surface.end_text_edit();
                self.surface.select(None);
                self.surface.set_selectable(false);
                self.surface.set_cursor(SurfaceCursor::Crosshair);
                if let Some(kind) = tool.shape_kind() {
                    self.draft = Some(ShapeDraft {
                        kind,
                        session: DragSession::start(
                            Region::Rect(self.region),
                            DragOptions::sticky_anywhere(),
                        ),
                        object: None,
                    });
                }
            }
        }
    }

    fn pause(&mut self, tool: ToolKind) {
        match tool {
            ToolKind::Pen | ToolKind::Mosaic => self.surface.set_brush(None),
            ToolKind::Text => {
                self.surface.end_text_edit();
                self.surface.set_cursor(SurfaceCursor::Default);
                self.surface.set_selectable(true);
            }
            ToolKind::Rectangle | ToolKind::Ellipse | ToolKind::Arrow => {
                if let Some(mut draft) = self.draft.take() {
                    draft.session.stop();
                    if let Some(id) = draft.object {
                        self.surface.remove_object(id);
                    }
                }
                self.surface.set_cursor(SurfaceCursor::Default);
                self.surface.set_selectable(true);
            }
        }
    }

    /// Routes a pointer event to the active tool or the surface.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        match self.active {
            Some(ToolKind::Rectangle | ToolKind::Ellipse | ToolKind::Arrow) => {
                self.handle_shape(event)
            }
            Some(ToolKind::Text) => self.handle_text_click(event),
            Some(ToolKind::Pen | ToolKind::Mosaic) | None => self.surface.pointer(event),
        }
    }

    fn to_local(&self, pos: Pos2) -> Pos2 {
        (self.region.clamp(pos) - self.region.min).to_pos2()
    }

    fn handle_shape(&mut self, event: &PointerEvent) -> bool {
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        let Some(drag) = draft.session.handle(event) else {
            return false;
        };
        let kind = draft.kind;

        let (start, end) = match drag {
            DragEvent::Down { start } => (start, start),
            DragEvent::Move { start, end } | DragEvent::Up { start, end } => (start, end),
        };
        let Some(shape) = Annotation::shape(
            kind,
            self.to_local(start),
            self.to_local(end),
            self.styles.shape,
            self.styles.arrow_head,
        ) else {
            return false;
        };

        match drag {
            DragEvent::Down { .. } => {
                let id = self.surface.add_object(shape);
                if let Some(draft) = self.draft.as_mut() {
                    draft.object = Some(id);
                }
            }
            DragEvent::Move { .. } => {
                if let Some(id) = self.draft.as_ref().and_then(|d| d.object) {
                    self.surface.update_object(id, shape);
                }
            }
            DragEvent::Up { .. } => {
                let id = self.draft.as_mut().and_then(|d| d.object.take());
                let degenerate = shape.is_degenerate();
                if let Some(id) = id {
                    if degenerate {
                        log::debug!("dropping degenerate {kind:?}");
                        self.surface.remove_object(id);
                    } else {
                        self.surface.update_object(id, shape);
                        self.surface.set_controls(id, kind.default_controls());
                    }
                }
                self.set_active_tool(None);
                if let (Some(id), false) = (id, degenerate) {
                    self.surface.select(Some(id));
                }
            }
        }
        true
    }

    fn handle_text_click(&mut self, event: &PointerEvent) -> bool {
        let PointerEvent::Down { pos, button } = *event else {
            return false;
        };
        if button != egui::PointerButton::Primary || !self.region.contains(pos) {
            return false;
        }
        if self.surface.is_editing_text() {
            self.surface.end_text_edit();
            return true;
        }
        let id = self.surface.add_object(Annotation::Text {
            pos: self.to_local(pos),
            text: String::new(),
            style: self.styles.text,
        });
        self.surface.set_controls(id, AnnotationKind::Text.default_controls());
        self.surface.begin_text_edit(id);
        true
    }

    /// Typed text goes to the text object being edited, if any.
    pub fn handle_text(&mut self, text: &str) -> bool {
        if !self.surface.is_editing_text() {
            return false;
        }
        self.surface.insert_text(text);
        true
    }

    pub fn is_editing_text(&self) -> bool {
        self.surface.is_editing_text()
    }

    /// The Delete key; does nothing while text is being edited.
    pub fn delete_selected(&mut self) -> usize {
        if self.surface.is_editing_text() {
            return 0;
        }
        let removed = self.surface.remove_selected();
        if removed > 0 {
            log::debug!("removed {removed} object(s)");
        }
        removed
    }

    /// The Backspace key: deletes a character while editing text, otherwise the selection.
    pub fn backspace(&mut self) -> usize {
        if self.surface.is_editing_text() {
            self.surface.delete_char();
            return 0;
        }
        self.delete_selected()
    }

    /// Pauses the active tool and finishes any text edit.
    pub fn stop(&mut self) {
        self.set_active_tool(None);
        self.surface.end_text_edit();
        self.surface.select(None);
    }
}
