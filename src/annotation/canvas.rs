use std::collections::HashMap;

use egui::{
    Color32, Context, FontId, Painter, PointerButton, Pos2, Rect, Shape, Stroke, TextureHandle,
    TextureOptions, Vec2,
};
use image::RgbaImage;

use super::mosaic::{mosaic_tile, random_seed, stamps, tile_uv};
use super::object::{
    Annotation, AnnotationKind, Brush, Controls, MIN_OBJECT_SIZE, ObjectId, arrow_head_points,
};
use super::surface::{DrawingSurface, SurfaceCursor};
use crate::geometry::hit_testing::{HANDLE_HIT_PADDING, RESIZE_HANDLE_SIZE};
use crate::geometry::{CropRect, HandleDirection, clamp_delta, resize_from_handle};
use crate::input::PointerEvent;

const HIT_TOLERANCE: f32 = 4.0;
const CONTROL_SIZE: f32 = RESIZE_HANDLE_SIZE;
const ELLIPSE_SEGMENTS: usize = 64;
const SELECTION_COLOR: Color32 = Color32::from_rgb(30, 120, 255);

#[derive(Debug, Clone)]
struct CanvasObject {
    id: ObjectId,
    annotation: Annotation,
    controls: Controls,
}

#[derive(Debug, Clone)]
enum Gesture {
    Drawing {
        id: ObjectId,
    },
    Moving {
        id: ObjectId,
        start: Pos2,
        origin: Annotation,
    },
    Resizing {
        id: ObjectId,
        direction: HandleDirection,
        start: Pos2,
        origin: Annotation,
    },
}

/// The crate's drawing surface: a retained list of annotation objects over
/// the cropped pixels.
pub struct ObjectCanvas {
    /// Screen position of the canvas' top-left corner.
    origin: Pos2,
    size: Vec2,
    background: Option<RgbaImage>,
    objects: Vec<CanvasObject>,
    brush: Option<Brush>,
    cursor: SurfaceCursor,
    selectable: bool,
    selected: Option<ObjectId>,
    editing: Option<ObjectId>,
    gesture: Option<Gesture>,
    mosaic_seed: u64,
    /// Measured galley sizes of text objects, refreshed on paint.
    text_sizes: HashMap<ObjectId, Vec2>,
    background_texture: Option<TextureHandle>,
    mosaic_texture: Option<TextureHandle>,
}

impl std::fmt::Debug for ObjectCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectCanvas")
            .field("origin", &self.origin)
            .field("size", &self.size)
            .field("objects", &self.objects.len())
            .field("brush", &self.brush)
            .field("selected", &self.selected)
            .field("editing", &self.editing)
            .finish_non_exhaustive()
    }
}

impl ObjectCanvas {
    /// A canvas covering `region` on screen.
    pub fn new(region: Rect) -> Self {
        Self {
            origin: region.min,
            size: region.size(),
            background: None,
            objects: Vec::new(),
            brush: None,
            cursor: SurfaceCursor::Default,
            selectable: true,
            selected: None,
            editing: None,
            gesture: None,
            mosaic_seed: random_seed(),
            text_sizes: HashMap::new(),
            background_texture: None,
            mosaic_texture: None,
        }
    }

    pub fn region(&self) -> Rect {
        Rect::from_min_size(self.origin, self.size)
    }

    pub fn background(&self) -> Option<&RgbaImage> {
        self.background.as_ref()
    }

    pub fn brush(&self) -> Option<Brush> {
        self.brush
    }

    pub fn cursor(&self) -> SurfaceCursor {
        self.cursor
    }

    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn object(&self, id: ObjectId) -> Option<&Annotation> {
        self.find(id).map(|object| &object.annotation)
    }

    pub fn controls(&self, id: ObjectId) -> Option<Controls> {
        self.find(id).map(|object| object.controls)
    }

    /// Objects bottom to top.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &Annotation)> {
        self.objects.iter().map(|object| (object.id, &object.annotation))
    }

    pub fn mosaic_seed(&self) -> u64 {
        self.mosaic_seed
    }

    fn find(&self, id: ObjectId) -> Option<&CanvasObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    fn find_mut(&mut self, id: ObjectId) -> Option<&mut CanvasObject> {
        self.objects.iter_mut().find(|object| object.id == id)
    }

    fn to_local(&self, pos: Pos2) -> Pos2 {
        (pos - self.origin).to_pos2()
    }

    fn bounds(&self, object: &CanvasObject) -> Rect {
        match (&object.annotation, self.text_sizes.get(&object.id)) {
            (Annotation::Text { pos, style, .. }, Some(measured)) => Rect::from_min_size(
                *pos,
                Vec2::new(style.box_width, measured.y.max(style.size)),
            ),
            _ => object.annotation.bounds(),
        }
    }

    fn object_at(&self, local: Pos2) -> Option<ObjectId> {
        self.objects
            .iter()
            .rev()
            .find(|object| match object.annotation {
                Annotation::Text { .. } => self.bounds(object).expand(HIT_TOLERANCE).contains(local),
                _ => object.annotation.hit_test(local, HIT_TOLERANCE),
            })
            .map(|object| object.id)
    }

    fn control_at(&self, local: Pos2) -> Option<HandleDirection> {
        let object = self.find(self.selected?)?;
        let bounds = self.bounds(object);
        object.controls.visible().find(|dir| {
            Rect::from_center_size(
                dir.anchor(bounds),
                Vec2::splat(CONTROL_SIZE + 2.0 * HANDLE_HIT_PADDING),
            )
            .contains(local)
        })
    }

    fn pointer_down(&mut self, local: Pos2) -> bool {
        if let Some(brush) = self.brush {
            let annotation = match brush {
                Brush::Pen(style) => Annotation::Stroke {
                    points: vec![local],
                    style,
                },
                Brush::Mosaic(style) => Annotation::Mosaic {
                    points: vec![local],
                    style,
                },
            };
            let id = self.add_object(annotation);
            self.gesture = Some(Gesture::Drawing { id });
            return true;
        }

        if !self.selectable {
            return false;
        }

        if let Some(direction) = self.control_at(local) {
            if let Some(id) = self.selected {
                if let Some(object) = self.find(id) {
                    self.gesture = Some(Gesture::Resizing {
                        id,
                        direction,
                        start: local,
                        origin: object.annotation.clone(),
                    });
                    return true;
                }
            }
        }

        match self.object_at(local) {
            Some(id) => {
                if self.editing.is_some_and(|editing| editing != id) {
                    self.end_text_edit();
                }
                self.selected = Some(id);
                if let Some(object) = self.find(id) {
                    self.gesture = Some(Gesture::Moving {
                        id,
                        start: local,
                        origin: object.annotation.clone(),
                    });
                }
                true
            }
            None => {
                self.end_text_edit();
                self.selected = None;
                false
            }
        }
    }

    fn pointer_move(&mut self, local: Pos2) {
        let size = self.size;
        match self.gesture.clone() {
            Some(Gesture::Drawing { id }) => {
                if let Some(object) = self.find_mut(id) {
                    if let Annotation::Stroke { points, .. } | Annotation::Mosaic { points, .. } =
                        &mut object.annotation
                    {
                        if points.last().is_none_or(|last| last.distance(local) >= 1.0) {
                            points.push(local);
                        }
                    }
                }
            }
            Some(Gesture::Moving { id, start, origin }) => {
                let from = CropRect::from_screen(origin.bounds(), Pos2::ZERO);
                let delta = clamp_delta(from, local - start, size);
                let mut annotation = origin;
                annotation.translate(delta);
                if let Some(object) = self.find_mut(id) {
                    object.annotation = annotation;
                }
            }
            Some(Gesture::Resizing {
                id,
                direction,
                start,
                origin,
            }) => {
                let from = CropRect::from_screen(origin.bounds(), Pos2::ZERO);
                let resized =
                    resize_from_handle(direction, from, local - start, size, MIN_OBJECT_SIZE);
                let mut annotation = origin;
                annotation.resize_to(resized.to_screen(Pos2::ZERO));
                if let Some(object) = self.find_mut(id) {
                    object.annotation = annotation;
                }
            }
            None => {}
        }
    }

    fn pointer_up(&mut self, local: Pos2) {
        self.pointer_move(local);
        if let Some(Gesture::Drawing { id }) = self.gesture {
            log::debug!("finished free-draw stroke {:?}", id.0);
        }
        self.gesture = None;
    }

    /// Paints the background and all objects; `chrome` adds selection outlines and controls.
    pub fn paint(&mut self, ctx: &Context, painter: &Painter, chrome: bool) {
        let region = self.region();

        if self.background_texture.is_none() {
            if let Some(background) = &self.background {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [background.width() as usize, background.height() as usize],
                    background.as_raw(),
                );
                self.background_texture =
                    Some(ctx.load_texture("snip-canvas-background", image, TextureOptions::LINEAR));
            }
        }
        if let Some(texture) = &self.background_texture {
            painter.image(
                texture.id(),
                region,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        let painter = painter.with_clip_rect(region);
        let offset = self.origin.to_vec2();
        let mut measured = HashMap::new();

        for object in &self.objects {
            match &object.annotation {
                Annotation::Stroke { points, style } => {
                    let points: Vec<Pos2> = points.iter().map(|p| *p + offset).collect();
                    let stroke = Stroke::new(style.width, style.color);
                    if let [only] = points.as_slice() {
                        painter.circle_filled(*only, style.width / 2.0, style.color);
                    } else {
                        painter.add(Shape::line(points, stroke));
                    }
                }
                Annotation::Mosaic { points, style } => {
                    let texture = self.mosaic_texture.get_or_insert_with(|| {
                        ctx.load_texture(
                            "snip-mosaic-tile",
                            mosaic_tile(style.tile, self.mosaic_seed),
                            TextureOptions::NEAREST_REPEAT,
                        )
                    });
                    for stamp in stamps(points, style.width) {
                        painter.image(
                            texture.id(),
                            stamp.translate(offset),
                            tile_uv(stamp, style.tile),
                            Color32::WHITE,
                        );
                    }
                }
                Annotation::Rectangle { rect, style } => {
                    painter.rect_stroke(
                        rect.translate(offset),
                        0.0,
                        Stroke::new(style.width, style.color),
                    );
                }
                Annotation::Ellipse { rect, style } => {
                    let rect = rect.translate(offset);
                    let center = rect.center();
                    let radius = rect.size() / 2.0;
                    let points = (0..ELLIPSE_SEGMENTS)
                        .map(|i| {
                            let t = i as f32 / ELLIPSE_SEGMENTS as f32 * std::f32::consts::TAU;
                            center + Vec2::new(radius.x * t.cos(), radius.y * t.sin())
                        })
                        .collect();
                    painter.add(Shape::closed_line(points, Stroke::new(style.width, style.color)));
                }
                Annotation::Arrow {
                    from,
                    to,
                    style,
                    head,
                } => {
                    let stroke = Stroke::new(style.width, style.color);
                    let (from, to) = (*from + offset, *to + offset);
                    painter.line_segment([from, to], stroke);
                    if let Some((left, right)) = arrow_head_points(from, to, *head) {
                        painter.line_segment([to, left], stroke);
                        painter.line_segment([to, right], stroke);
                    }
                }
                Annotation::Text { pos, text, style } => {
                    let editing = chrome && self.editing == Some(object.id);
                    let shown = if editing {
                        format!("{text}|")
                    } else {
                        text.clone()
                    };
                    let galley = painter.layout(
                        shown,
                        FontId::proportional(style.size),
                        style.color,
                        style.box_width,
                    );
                    measured.insert(object.id, galley.size());
                    painter.galley(*pos + offset, galley, style.color);
                }
            }
        }
        self.text_sizes = measured;

        if chrome {
            self.paint_selection(&painter, offset);
        }
    }

    fn paint_selection(&self, painter: &Painter, offset: Vec2) {
        let Some(object) = self.selected.and_then(|id| self.find(id)) else {
            return;
        };
        let bounds = self.bounds(object).translate(offset);
        painter.rect_stroke(bounds, 0.0, Stroke::new(1.0, SELECTION_COLOR));
        for direction in object.controls.visible() {
            let control = Rect::from_center_size(direction.anchor(bounds), Vec2::splat(CONTROL_SIZE));
            painter.rect_filled(control, 1.0, Color32::WHITE);
            painter.rect_stroke(control, 1.0, Stroke::new(1.0, SELECTION_COLOR));
        }
    }
}

impl DrawingSurface for ObjectCanvas {
    fn set_background(&mut self, image: RgbaImage) {
        self.background = Some(image);
        self.background_texture = None;
    }

    fn set_brush(&mut self, brush: Option<Brush>) {
        self.brush = brush;
        self.cursor = if brush.is_some() {
            SurfaceCursor::Crosshair
        } else {
            SurfaceCursor::Default
        };
        if brush.is_some() {
            self.selected = None;
            self.end_text_edit();
        }
    }

    fn set_cursor(&mut self, cursor: SurfaceCursor) {
        self.cursor = cursor;
    }

    fn set_selectable(&mut self, selectable: bool) {
        self.selectable = selectable;
        if !selectable {
            self.selected = None;
        }
    }

    fn add_object(&mut self, object: Annotation) -> ObjectId {
        let id = ObjectId::new();
        let controls = object.kind().default_controls();
        self.objects.push(CanvasObject {
            id,
            annotation: object,
            controls,
        });
        id
    }

    fn update_object(&mut self, id: ObjectId, object: Annotation) {
        if let Some(existing) = self.find_mut(id) {
            existing.annotation = object;
        }
    }

    fn remove_object(&mut self, id: ObjectId) {
        self.objects.retain(|object| object.id != id);
        self.text_sizes.remove(&id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.editing == Some(id) {
            self.editing = None;
        }
    }

    fn set_controls(&mut self, id: ObjectId, controls: Controls) {
        if let Some(object) = self.find_mut(id) {
            object.controls = controls;
        }
    }

    fn select(&mut self, id: Option<ObjectId>) {
        self.selected = id.filter(|id| self.find(*id).is_some());
    }

    fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    fn begin_text_edit(&mut self, id: ObjectId) {
        if self
            .find(id)
            .is_some_and(|object| object.annotation.kind() == AnnotationKind::Text)
        {
            self.editing = Some(id);
            self.selected = Some(id);
        }
    }

    fn end_text_edit(&mut self) {
        let Some(id) = self.editing.take() else {
            return;
        };
        if self.find(id).is_some_and(|object| object.annotation.is_degenerate()) {
            self.remove_object(id);
        }
    }

    fn is_editing_text(&self) -> bool {
        self.editing.is_some()
    }

    fn insert_text(&mut self, input: &str) {
        let Some(id) = self.editing else {
            return;
        };
        if let Some(CanvasObject {
            annotation: Annotation::Text { text, .. },
            ..
        }) = self.find_mut(id)
        {
            text.push_str(input);
        }
    }

    fn delete_char(&mut self) {
        let Some(id) = self.editing else {
            return;
        };
        if let Some(CanvasObject {
            annotation: Annotation::Text { text, .. },
            ..
        }) = self.find_mut(id)
        {
            text.pop();
        }
    }

    fn remove_selected(&mut self) -> usize {
        match self.selected {
            Some(id) => {
                self.remove_object(id);
                1
            }
            None => 0,
        }
    }

    fn pointer(&mut self, event: &PointerEvent) -> bool {
        match *event {
            PointerEvent::Down { pos, button } => {
                if button != PointerButton::Primary || !self.region().contains(pos) {
                    return false;
                }
                let local = self.to_local(pos);
                self.pointer_down(local)
            }
            PointerEvent::Move { pos } => {
                if self.gesture.is_none() {
                    return false;
                }
                let local = self.to_local(pos);
                self.pointer_move(local);
                true
            }
            PointerEvent::Up { pos, button } => {
                if button != PointerButton::Primary || self.gesture.is_none() {
                    return false;
                }
                let local = self.to_local(pos);
                self.pointer_up(local);
                true
            }
        }
    }
}
