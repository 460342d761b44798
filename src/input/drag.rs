use egui::{PointerButton, Pos2, Rect};

use super::PointerEvent;

/// The area a drag session listens on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Region {
    Rect(Rect),
    /// The whole window, like a listener on the document.
    Anywhere,
}

impl Region {
    pub fn contains(&self, pos: Pos2) -> bool {
        match self {
            Region::Rect(rect) => rect.contains(pos),
            Region::Anywhere => true,
        }
    }
}

/// Where move and up events are accepted, and whether the session survives its first drag.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragOptions {
    /// Defaults to the session's node.
    pub move_region: Option<Region>,
    /// Defaults to the session's node.
    pub up_region: Option<Region>,
    /// Keep listening for further drags after the first pointer-up.
    pub sticky: bool,
}

impl DragOptions {
    /// Tracks move and up anywhere and keeps listening after each drag.
    pub fn sticky_anywhere() -> Self {
        Self {
            move_region: Some(Region::Anywhere),
            up_region: Some(Region::Anywhere),
            sticky: true,
        }
    }

    /// Tracks move and up anywhere for a single drag.
    pub fn once_anywhere() -> Self {
        Self {
            sticky: false,
            ..Self::sticky_anywhere()
        }
    }
}

/// What a session reports for an accepted pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Down { start: Pos2 },
    Move { start: Pos2, end: Pos2 },
    Up { start: Pos2, end: Pos2 },
}

impl DragEvent {
    /// `end - start`, zero for a down event.
    pub fn delta(&self) -> egui::Vec2 {
        match self {
            DragEvent::Down { .. } => egui::Vec2::ZERO,
            DragEvent::Move { start, end } | DragEvent::Up { start, end } => *end - *start,
        }
    }
}

/// A single pointer-down → move* → up sequence over a node.
///
/// The session only reports positions; it never clamps. Once stopped, or
/// after its first pointer-up when not sticky, it ignores all input.
#[derive(Debug, Clone)]
pub struct DragSession {
    node: Region,
    move_region: Option<Region>,
    up_region: Option<Region>,
    sticky: bool,
    listening: bool,
    start: Option<Pos2>,
}

impl DragSession {
    /// Starts listening for a primary-button press inside `node`.
    pub fn start(node: Region, options: DragOptions) -> Self {
        Self {
            node,
            move_region: options.move_region,
            up_region: options.up_region,
            sticky: options.sticky,
            listening: true,
            start: None,
        }
    }

    /// Re-positions the node, e.g. when the handle it belongs to moved.
    pub fn set_node(&mut self, node: Region) {
        self.node = node;
    }

    pub fn node(&self) -> Region {
        self.node
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn is_dragging(&self) -> bool {
        self.start.is_some()
    }

    pub fn start_position(&self) -> Option<Pos2> {
        self.start
    }

    /// Detaches everything, whatever the sticky mode or drag progress.
    pub fn stop(&mut self) {
        self.listening = false;
        self.sticky = false;
        self.start = None;
    }

    /// Feeds one pointer event; returns what the session observed, if anything.
    pub fn handle(&mut self, event: &PointerEvent) -> Option<DragEvent> {
        if !self.listening {
            return None;
        }

        match *event {
            PointerEvent::Down { pos, button } => {
                if button != PointerButton::Primary || self.start.is_some() {
                    return None;
                }
                if !self.node.contains(pos) {
                    return None;
                }
                self.start = Some(pos);
                Some(DragEvent::Down { start: pos })
            }
            PointerEvent::Move { pos } => {
                let start = self.start?;
                let region = self.move_region.unwrap_or(self.node);
                region
                    .contains(pos)
                    .then_some(DragEvent::Move { start, end: pos })
            }
            PointerEvent::Up { pos, button } => {
                if button != PointerButton::Primary {
                    return None;
                }
                let start = self.start?;
                let region = self.up_region.unwrap_or(self.node);
                if !region.contains(pos) {
                    return None;
                }
                self.start = None;
                if !self.sticky {
                    self.listening = false;
                }
                Some(DragEvent::Up { start, end: pos })
            }
        }
    }
}
