//! The crop-region interaction state machine.
//!
//! ```text
//!          down              up (big enough)
//! Idle ──────────► DraggingNew ──────────────► Selected ◄──┐
//!                       │  up (too small)        │  │      │ up
//!                       └──► snip full ──────────┘  ├─► DraggingMove
//!                                                   └─► DraggingResize
//! ```
//!
//! The controller is the only writer of the crop rectangle. Every write goes
//! through [`SelectionController::set_rect`], which also moves the handle and
//! move sessions and recomputes the size readout.

use egui::{Pos2, Rect, Vec2};

use crate::config::SnipOptions;
use crate::geometry::hit_testing::handle_rect;
use crate::geometry::{
    CropRect, HandleDirection, apply_edge_snap, clamp_move, rect_from_corners, resize_from_handle,
};
use crate::input::{DragEvent, DragOptions, DragSession, PointerEvent, Region};

/// Height reserved above the rectangle for the size readout.
pub const READOUT_HEIGHT: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionState {
    /// Waiting for the rubber-band drag to start.
    Idle,
    DraggingNew,
    /// A finalized rectangle exists.
    Selected,
    DraggingMove {
        origin: CropRect,
    },
    DraggingResize {
        direction: HandleDirection,
        origin: CropRect,
    },
}

/// Follow-up work the owner of the controller has to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEffect {
    /// The toolbar and crop canvas no longer match the rectangle.
    Invalidate,
    /// The rectangle settled; rebuild the toolbar and crop canvas.
    Regenerate,
}

/// The live `width × height` label.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeReadout {
    pub text: String,
    /// Top-left of the label, container-local.
    pub anchor: Pos2,
}

impl SizeReadout {
    pub fn for_rect(rect: &CropRect) -> Self {
        let text = format!("{} × {}", rect.width.round(), rect.height.round());
        let anchor = if rect.top >= READOUT_HEIGHT {
            Pos2::new(rect.left, rect.top - READOUT_HEIGHT)
        } else {
            Pos2::new(rect.left + 4.0, rect.top + 4.0)
        };
        Self { text, anchor }
    }
}

#[derive(Debug)]
pub struct SelectionController {
    container: Rect,
    rect: CropRect,
    state: SelectionState,
    weld: Option<f32>,
    min_size: f32,
    handle_size: f32,
    rubber_band: Option<DragSession>,
    handles: Vec<(HandleDirection, DragSession)>,
    mover: Option<DragSession>,
    readout: Option<SizeReadout>,
    frozen: bool,
    effects: Vec<SelectionEffect>,
}

impl SelectionController {
    /// `container` is the host's screen rect.
    pub fn new(container: Rect, options: &SnipOptions) -> Self {
        let mut controller = Self {
            container,
            rect: CropRect::default(),
            state: SelectionState::Idle,
            weld: options.weld_distance(),
            min_size: options.min_size,
            handle_size: options.handle_size,
            rubber_band: None,
            handles: Vec::new(),
            mover: None,
            readout: None,
            frozen: false,
            effects: Vec::new(),
        };

        if options.auto_full {
            log::info!("auto-full selection");
            controller.snip_full();
        } else {
            controller.rubber_band = Some(DragSession::start(
                Region::Rect(container),
                DragOptions::once_anywhere(),
            ));
        }
        controller
    }

    pub fn container(&self) -> Rect {
        self.container
    }

    pub fn container_size(&self) -> Vec2 {
        self.container.size()
    }

    pub fn rect(&self) -> CropRect {
        self.rect
    }

    /// The crop rectangle in screen coordinates.
    pub fn screen_rect(&self) -> Rect {
        self.rect.to_screen(self.container.min)
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn readout(&self) -> Option<&SizeReadout> {
        self.readout.as_ref()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// A rectangle has been finalized at least once.
    pub fn has_selection(&self) -> bool {
        !matches!(self.state, SelectionState::Idle | SelectionState::DraggingNew)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(
            self.state,
            SelectionState::DraggingNew
                | SelectionState::DraggingMove { .. }
                | SelectionState::DraggingResize { .. }
        )
    }

    /// Screen rects of the live resize handles.
    pub fn handle_rects(&self) -> Vec<(HandleDirection, Rect)> {
        if self.frozen || !self.has_selection() {
            return Vec::new();
        }
        let screen = self.screen_rect();
        HandleDirection::ALL
            .into_iter()
            .map(|dir| (dir, handle_rect(dir, screen, self.handle_size)))
            .collect()
    }

    pub fn take_effects(&mut self) -> Vec<SelectionEffect> {
        std::mem::take(&mut self.effects)
    }

    /// The single write path for the crop rectangle.
    pub fn set_rect(&mut self, rect: CropRect) {
        self.rect = rect;
        self.readout = Some(SizeReadout::for_rect(&rect));

        let screen = self.screen_rect();
        for (direction, session) in &mut self.handles {
            session.set_node(Region::Rect(handle_rect(*direction, screen, self.handle_size)));
        }
        if let Some(mover) = self.mover.as_mut() {
            mover.set_node(Region::Rect(screen));
        }
    }

    /// Routes one pointer event; returns whether the controller consumed it.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        if self.frozen {
            return false;
        }

        match self.state {
            SelectionState::Idle | SelectionState::DraggingNew => self.handle_rubber_band(event),
            SelectionState::Selected => self.handle_grab(event),
            SelectionState::DraggingResize { direction, origin } => {
                let Some(drag) = self
                    .handles
                    .iter_mut()
                    .find(|(dir, _)| *dir == direction)
                    .and_then(|(_, session)| session.handle(event))
                else {
                    return false;
                };
                let resized = resize_from_handle(
                    direction,
                    origin,
                    drag.delta(),
                    self.container_size(),
                    self.min_size,
                );
                self.set_rect(resized);
                if matches!(drag, DragEvent::Up { .. }) {
                    log::debug!("resize {} finished at {:?}", direction.as_str(), self.rect);
                    self.settle();
                }
                true
            }
            SelectionState::DraggingMove { origin } => {
                let Some(drag) = self.mover.as_mut().and_then(|mover| mover.handle(event)) else {
                    return false;
                };
                self.set_rect(clamp_move(origin, drag.delta(), self.container_size()));
                if matches!(drag, DragEvent::Up { .. }) {
                    log::debug!("move finished at {:?}", self.rect);
                    self.settle();
                }
                true
            }
        }
    }

    /// Stops the move and resize sessions for good; the crop region is final.
    pub fn freeze(&mut self) {
        if self.frozen {
            return;
        }
        log::info!("selection frozen at {:?}", self.rect);
        for (_, session) in &mut self.handles {
            session.stop();
        }
        if let Some(mover) = self.mover.as_mut() {
            mover.stop();
        }
        self.handles.clear();
        self.mover = None;
        self.frozen = true;
        if self.is_dragging() {
            self.state = SelectionState::Selected;
        }
    }

    /// Cancels every session this controller owns.
    pub fn stop(&mut self) {
        if let Some(rubber_band) = self.rubber_band.as_mut() {
            rubber_band.stop();
        }
        self.rubber_band = None;
        self.freeze();
        self.effects.clear();
    }

    fn handle_rubber_band(&mut self, event: &PointerEvent) -> bool {
        let Some(drag) = self
            .rubber_band
            .as_mut()
            .and_then(|session| session.handle(event))
        else {
            return false;
        };

        match drag {
            DragEvent::Down { start } => {
                self.state = SelectionState::DraggingNew;
                let rect = self.live_rect(start, start);
                self.set_rect(rect);
            }
            DragEvent::Move { start, end } => {
                let rect = self.live_rect(start, end);
                self.set_rect(rect);
            }
            DragEvent::Up { start, end } => {
                self.rubber_band = None;
                let rect = self.live_rect(start, end);
                if rect.is_at_least(self.min_size) {
                    self.set_rect(rect);
                    self.enter_selected();
                } else {
                    log::info!("selection {rect:?} below minimum size, snipping full");
                    self.snip_full();
                }
            }
        }
        true
    }

    fn handle_grab(&mut self, event: &PointerEvent) -> bool {
        for (direction, session) in &mut self.handles {
            if let Some(DragEvent::Down { .. }) = session.handle(event) {
                self.state = SelectionState::DraggingResize {
                    direction: *direction,
                    origin: self.rect,
                };
                self.effects.push(SelectionEffect::Invalidate);
                return true;
            }
        }
        if let Some(DragEvent::Down { .. }) = self.mover.as_mut().and_then(|m| m.handle(event)) {
            self.state = SelectionState::DraggingMove { origin: self.rect };
            self.effects.push(SelectionEffect::Invalidate);
            return true;
        }
        false
    }

    /// The rubber-band rectangle between two screen points, kept inside the container.
    fn live_rect(&self, start: Pos2, end: Pos2) -> CropRect {
        let start = self.container.clamp(start);
        let end = self.container.clamp(end);
        let rect = rect_from_corners(start, end, self.container);
        apply_edge_snap(rect, self.container_size(), self.weld)
    }

    fn snip_full(&mut self) {
        self.set_rect(CropRect::full(self.container_size()));
        self.enter_selected();
    }

    fn enter_selected(&mut self) {
        let screen = self.screen_rect();
        self.handles = HandleDirection::ALL
            .into_iter()
            .map(|dir| {
                let node = Region::Rect(handle_rect(dir, screen, self.handle_size));
                (dir, DragSession::start(node, DragOptions::sticky_anywhere()))
            })
            .collect();
        // Corners are listed first so they win where they overlap an edge handle.
        self.handles.sort_by_key(|(dir, _)| {
            !(dir.moves_left() || dir.moves_right()) || !(dir.moves_top() || dir.moves_bottom())
        });
        self.mover = Some(DragSession::start(
            Region::Rect(screen),
            DragOptions::sticky_anywhere(),
        ));
        self.settle();
    }

    fn settle(&mut self) {
        self.state = SelectionState::Selected;
        self.effects.push(SelectionEffect::Regenerate);
    }
}
