use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{LineStyle, MosaicStyle, TextStyle};
use crate::geometry::HandleDirection;
use crate::geometry::hit_testing::{bounds_of, distance_to_segment};

/// Line height of text boxes relative to their font size.
pub const TEXT_LINE_HEIGHT: f32 = 1.3;
/// Objects cannot be resized below this size.
pub const MIN_OBJECT_SIZE: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub Uuid);

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

/// A free-draw brush installed on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Brush {
    Pen(LineStyle),
    Mosaic(MosaicStyle),
}

/// Which transform controls a drawn object shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub corners: bool,
    /// Middle-left and middle-right.
    pub left_right: bool,
    /// Middle-top and middle-bottom.
    pub top_bottom: bool,
    pub rotate: bool,
}

impl Controls {
    pub const NONE: Controls = Controls {
        corners: false,
        left_right: false,
        top_bottom: false,
        rotate: false,
    };

    pub const ALL_BUT_ROTATE: Controls = Controls {
        corners: true,
        left_right: true,
        top_bottom: true,
        rotate: false,
    };

    pub const TEXT: Controls = Controls {
        corners: false,
        left_right: true,
        top_bottom: false,
        rotate: false,
    };

    pub fn allows(&self, direction: HandleDirection) -> bool {
        match direction {
            HandleDirection::Left | HandleDirection::Right => self.left_right,
            HandleDirection::Top | HandleDirection::Bottom => self.top_bottom,
            HandleDirection::TopLeft
            | HandleDirection::TopRight
            | HandleDirection::BottomLeft
            | HandleDirection::BottomRight => self.corners,
        }
    }

    pub fn visible(&self) -> impl Iterator<Item = HandleDirection> + '_ {
        HandleDirection::ALL
            .into_iter()
            .filter(move |dir| self.allows(*dir))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    Stroke,
    Mosaic,
    Rectangle,
    Ellipse,
    Arrow,
    Text,
}

impl AnnotationKind {
    /// Controls a freshly created object of this kind gets.
    pub fn default_controls(&self) -> Controls {
        match self {
            AnnotationKind::Text => Controls::TEXT,
            AnnotationKind::Rectangle | AnnotationKind::Ellipse | AnnotationKind::Arrow => {
                Controls::ALL_BUT_ROTATE
            }
            AnnotationKind::Stroke | AnnotationKind::Mosaic => Controls::NONE,
        }
    }
}

/// An object on the drawing surface, in canvas-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    Stroke {
        points: Vec<Pos2>,
        style: LineStyle,
    },
    Mosaic {
        points: Vec<Pos2>,
        style: MosaicStyle,
    },
    Rectangle {
        rect: Rect,
        style: LineStyle,
    },
    Ellipse {
        rect: Rect,
        style: LineStyle,
    },
    Arrow {
        from: Pos2,
        to: Pos2,
        style: LineStyle,
        head: f32,
    },
    Text {
        pos: Pos2,
        text: String,
        style: TextStyle,
    },
}

impl Annotation {
    pub fn kind(&self) -> AnnotationKind {
        match self {
            Annotation::Stroke { .. } => AnnotationKind::Stroke,
            Annotation::Mosaic { .. } => AnnotationKind::Mosaic,
            Annotation::Rectangle { .. } => AnnotationKind::Rectangle,
            Annotation::Ellipse { .. } => AnnotationKind::Ellipse,
            Annotation::Arrow { .. } => AnnotationKind::Arrow,
            Annotation::Text { .. } => AnnotationKind::Text,
        }
    }

    /// Bounding box; text uses an estimate of its wrapped height.
    pub fn bounds(&self) -> Rect {
        match self {
            Annotation::Stroke { points, style } => bounds_of(points, style.width / 2.0),
            Annotation::Mosaic { points, style } => bounds_of(points, style.width / 2.0),
            Annotation::Rectangle { rect, .. } | Annotation::Ellipse { rect, .. } => *rect,
            Annotation::Arrow { from, to, .. } => Rect::from_two_pos(*from, *to),
            Annotation::Text { pos, text, style } => {
                let lines = text.lines().count().max(1) as f32;
                Rect::from_min_size(
                    *pos,
                    Vec2::new(style.box_width, lines * style.size * TEXT_LINE_HEIGHT),
                )
            }
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Annotation::Stroke { points, .. } | Annotation::Mosaic { points, .. } => {
                for point in points.iter_mut() {
                    *point += delta;
                }
            }
            Annotation::Rectangle { rect, .. } | Annotation::Ellipse { rect, .. } => {
                *rect = rect.translate(delta);
            }
            Annotation::Arrow { from, to, .. } => {
                *from += delta;
                *to += delta;
            }
            Annotation::Text { pos, .. } => *pos += delta,
        }
    }

    /// Fits the object into `target`, which was derived from [`Annotation::bounds`].
    pub fn resize_to(&mut self, target: Rect) {
        let source = self.bounds();
        match self {
            Annotation::Rectangle { rect, .. } | Annotation::Ellipse { rect, .. } => *rect = target,
            Annotation::Arrow { from, to, .. } => {
                *from = remap(*from, source, target);
                *to = remap(*to, source, target);
            }
            Annotation::Text { pos, style, .. } => {
                pos.x = target.min.x;
                style.box_width = target.width().max(MIN_OBJECT_SIZE);
            }
            Annotation::Stroke { points, .. } | Annotation::Mosaic { points, .. } => {
                for point in points.iter_mut() {
                    *point = remap(*point, source, target);
                }
            }
        }
    }

    pub fn hit_test(&self, pos: Pos2, tolerance: f32) -> bool {
        match self {
            Annotation::Stroke { points, style } => {
                polyline_hit(points, pos, tolerance + style.width / 2.0)
            }
            Annotation::Mosaic { points, style } => {
                polyline_hit(points, pos, tolerance + style.width / 2.0)
            }
            Annotation::Arrow {
                from, to, style, ..
            } => distance_to_segment(pos, *from, *to) <= tolerance + style.width,
            Annotation::Rectangle { .. } | Annotation::Ellipse { .. } | Annotation::Text { .. } => {
                self.bounds().expand(tolerance).contains(pos)
            }
        }
    }

    /// The shape a drag from `start` to `end` produces for a shape tool.
    pub fn shape(kind: AnnotationKind, start: Pos2, end: Pos2, style: LineStyle, head: f32) -> Option<Self> {
        match kind {
            AnnotationKind::Rectangle => Some(Annotation::Rectangle {
                rect: Rect::from_two_pos(start, end),
                style,
            }),
            AnnotationKind::Ellipse => Some(Annotation::Ellipse {
                rect: Rect::from_two_pos(start, end),
                style,
            }),
            AnnotationKind::Arrow => Some(Annotation::Arrow {
                from: start,
                to: end,
                style,
                head,
            }),
            AnnotationKind::Stroke | AnnotationKind::Mosaic | AnnotationKind::Text => None,
        }
    }

    /// True for shapes too small to keep after a click without a drag.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Annotation::Arrow { from, to, .. } => from.distance(*to) < 2.0,
            Annotation::Rectangle { rect, .. } | Annotation::Ellipse { rect, .. } => {
                rect.width() < 2.0 && rect.height() < 2.0
            }
            Annotation::Text { text, .. } => text.trim().is_empty(),
            Annotation::Stroke { points, .. } | Annotation::Mosaic { points, .. } => {
                points.is_empty()
            }
        }
    }
}

fn remap(point: Pos2, source: Rect, target: Rect) -> Pos2 {
    let axis = |p: f32, s0: f32, s1: f32, t0: f32, t1: f32| {
        if (s1 - s0).abs() < f32::EPSILON {
            t0 + (p - s0)
        } else {
            t0 + (p - s0) / (s1 - s0) * (t1 - t0)
        }
    };
    Pos2::new(
        axis(point.x, source.min.x, source.max.x, target.min.x, target.max.x),
        axis(point.y, source.min.y, source.max.y, target.min.y, target.max.y),
    )
}

fn polyline_hit(points: &[Pos2], pos: Pos2, tolerance: f32) -> bool {
    match points {
        [] => false,
        [only] => only.distance(pos) <= tolerance,
        _ => points
            .windows(2)
            .any(|pair| distance_to_segment(pos, pair[0], pair[1]) <= tolerance),
    }
}

/// The two ends of an arrow head at `to`, or `None` for a zero-length arrow.
pub fn arrow_head_points(from: Pos2, to: Pos2, head: f32) -> Option<(Pos2, Pos2)> {
    let dir = to - from;
    let len = dir.length();
    if len < f32::EPSILON {
        return None;
    }
    let back = -dir / len * head;
    let angle = std::f32::consts::FRAC_PI_6;
    let (sin, cos) = angle.sin_cos();
    let left = Vec2::new(back.x * cos - back.y * sin, back.x * sin + back.y * cos);
    let right = Vec2::new(back.x * cos + back.y * sin, -back.x * sin + back.y * cos);
    Some((to + left, to + right))
}
