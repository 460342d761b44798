use image::RgbaImage;

use super::object::{Annotation, Brush, Controls, ObjectId};
use crate::input::PointerEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceCursor {
    #[default]
    Default,
    Crosshair,
    Text,
}

impl SurfaceCursor {
    pub fn icon(&self) -> egui::CursorIcon {
        match self {
            SurfaceCursor::Default => egui::CursorIcon::Default,
            SurfaceCursor::Crosshair => egui::CursorIcon::Crosshair,
            SurfaceCursor::Text => egui::CursorIcon::Text,
        }
    }
}

/// The object-based canvas the annotation session drives once cropping is final.
///
/// Positions passed to object methods are canvas-local; pointer events are in
/// screen coordinates.
pub trait DrawingSurface {
    /// Pixels drawn underneath every object.
    fn set_background(&mut self, image: RgbaImage);

    /// Installs a free-draw brush, or returns to object mode with `None`.
    fn set_brush(&mut self, brush: Option<Brush>);

    fn set_cursor(&mut self, cursor: SurfaceCursor);

    /// Whether clicks select and drag existing objects.
    fn set_selectable(&mut self, selectable: bool);

    fn add_object(&mut self, object: Annotation) -> ObjectId;

    fn update_object(&mut self, id: ObjectId, object: Annotation);

    fn remove_object(&mut self, id: ObjectId);

    fn set_controls(&mut self, id: ObjectId, controls: Controls);

    fn select(&mut self, id: Option<ObjectId>);

    fn selected(&self) -> Option<ObjectId>;

    fn begin_text_edit(&mut self, id: ObjectId);

    fn end_text_edit(&mut self);

    fn is_editing_text(&self) -> bool;

    fn insert_text(&mut self, text: &str);

    fn delete_char(&mut self);

    /// Removes the selected object(s); returns how many went away.
    fn remove_selected(&mut self) -> usize;

    /// Free-draw and object manipulation; returns whether the event was used.
    fn pointer(&mut self, event: &PointerEvent) -> bool;
}
