mod crop;
pub mod hit_testing;

pub use crop::{apply_edge_snap, clamp_delta, clamp_move, rect_from_corners, resize_from_handle};

use egui::{CursorIcon, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest width/height a finalized crop rectangle may have.
pub const MIN_CROP_SIZE: f32 = 10.0;

/// Default distance at which the crop rectangle welds onto a container edge.
pub const DEFAULT_WELD_DISTANCE: f32 = 20.0;

/// A rectangle in container-local pixel coordinates.
///
/// This is the value the selection controller owns and every visual of the
/// crop region (mask, border, handles, readout, crop canvas) is derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl CropRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// The rectangle covering the whole container.
    pub fn full(container: Vec2) -> Self {
        Self::new(0.0, 0.0, container.x, container.y)
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// True when both dimensions reach `min`.
    pub fn is_at_least(&self, min: f32) -> bool {
        self.width >= min && self.height >= min
    }

    /// True when the rectangle lies inside a container of the given size.
    pub fn fits_in(&self, container: Vec2) -> bool {
        self.left >= 0.0
            && self.top >= 0.0
            && self.width >= 0.0
            && self.height >= 0.0
            && self.right() <= container.x + f32::EPSILON
            && self.bottom() <= container.y + f32::EPSILON
    }

    /// Screen-space rect for a container whose top-left corner is `origin`.
    pub fn to_screen(&self, origin: Pos2) -> Rect {
        Rect::from_min_size(
            origin + Vec2::new(self.left, self.top),
            Vec2::new(self.width, self.height),
        )
    }

    pub fn from_screen(rect: Rect, origin: Pos2) -> Self {
        Self::new(
            rect.min.x - origin.x,
            rect.min.y - origin.y,
            rect.width(),
            rect.height(),
        )
    }
}

/// One of the eight resize handles around the crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleDirection {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl HandleDirection {
    pub const ALL: [HandleDirection; 8] = [
        HandleDirection::TopLeft,
        HandleDirection::Top,
        HandleDirection::TopRight,
        HandleDirection::Right,
        HandleDirection::BottomRight,
        HandleDirection::Bottom,
        HandleDirection::BottomLeft,
        HandleDirection::Left,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HandleDirection::Top => "top",
            HandleDirection::Bottom => "bottom",
            HandleDirection::Left => "left",
            HandleDirection::Right => "right",
            HandleDirection::TopLeft => "topleft",
            HandleDirection::TopRight => "topright",
            HandleDirection::BottomLeft => "bottomleft",
            HandleDirection::BottomRight => "bottomright",
        }
    }

    /// Parses the compound names used by handle ids, e.g. `"bottomright"`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|dir| dir.as_str() == name)
    }

    pub fn moves_left(&self) -> bool {
        matches!(
            self,
            HandleDirection::Left | HandleDirection::TopLeft | HandleDirection::BottomLeft
        )
    }

    pub fn moves_right(&self) -> bool {
        matches!(
            self,
            HandleDirection::Right | HandleDirection::TopRight | HandleDirection::BottomRight
        )
    }

    pub fn moves_top(&self) -> bool {
        matches!(
            self,
            HandleDirection::Top | HandleDirection::TopLeft | HandleDirection::TopRight
        )
    }

    pub fn moves_bottom(&self) -> bool {
        matches!(
            self,
            HandleDirection::Bottom | HandleDirection::BottomLeft | HandleDirection::BottomRight
        )
    }

    /// Where the handle sits on a screen-space rect.
    pub fn anchor(&self, rect: Rect) -> Pos2 {
        let x = if self.moves_left() {
            rect.min.x
        } else if self.moves_right() {
            rect.max.x
        } else {
            rect.center().x
        };
        let y = if self.moves_top() {
            rect.min.y
        } else if self.moves_bottom() {
            rect.max.y
        } else {
            rect.center().y
        };
        Pos2::new(x, y)
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            HandleDirection::Top | HandleDirection::Bottom => CursorIcon::ResizeVertical,
            HandleDirection::Left | HandleDirection::Right => CursorIcon::ResizeHorizontal,
            HandleDirection::TopLeft | HandleDirection::BottomRight => CursorIcon::ResizeNwSe,
            HandleDirection::TopRight | HandleDirection::BottomLeft => CursorIcon::ResizeNeSw,
        }
    }
}
