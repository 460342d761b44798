use egui::{Key, PointerButton, Pos2};

mod drag;
pub use drag::{DragEvent, DragOptions, DragSession, Region};

/// A pointer event in screen coordinates, in the order it arrived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { pos: Pos2, button: PointerButton },
    Move { pos: Pos2 },
    Up { pos: Pos2, button: PointerButton },
}

impl PointerEvent {
    pub fn pos(&self) -> Pos2 {
        match self {
            PointerEvent::Down { pos, .. }
            | PointerEvent::Move { pos }
            | PointerEvent::Up { pos, .. } => *pos,
        }
    }

    /// Primary-button press at `pos`.
    pub fn down(pos: Pos2) -> Self {
        PointerEvent::Down {
            pos,
            button: PointerButton::Primary,
        }
    }

    pub fn moved(pos: Pos2) -> Self {
        PointerEvent::Move { pos }
    }

    /// Primary-button release at `pos`.
    pub fn up(pos: Pos2) -> Self {
        PointerEvent::Up {
            pos,
            button: PointerButton::Primary,
        }
    }
}

/// The document-level keyboard shortcuts of a live instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Escape
    Cancel,
    /// Enter
    Confirm,
    /// Delete
    Delete,
    /// Backspace
    Backspace,
}

impl KeyCommand {
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Escape => Some(KeyCommand::Cancel),
            Key::Enter => Some(KeyCommand::Confirm),
            Key::Delete => Some(KeyCommand::Delete),
            Key::Backspace => Some(KeyCommand::Backspace),
            _ => None,
        }
    }
}

/// One unit of input, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Pointer(PointerEvent),
    Key(KeyCommand),
    Text(String),
}

/// Converts raw egui input into pointer, key and text events.
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_pointer_pos(&self) -> Option<Pos2> {
        self.last_pointer_pos
    }

    /// Converts raw egui events, preserving their order.
    pub fn process_events(&mut self, events: &[egui::Event]) -> Vec<InputEvent> {
        let mut out = Vec::new();

        for event in events {
            match event {
                egui::Event::PointerMoved(pos) => {
                    if self.last_pointer_pos != Some(*pos) {
                        out.push(InputEvent::Pointer(PointerEvent::Move { pos: *pos }));
                    }
                    self.last_pointer_pos = Some(*pos);
                }
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    ..
                } => {
                    self.last_pointer_pos = Some(*pos);
                    out.push(InputEvent::Pointer(if *pressed {
                        PointerEvent::Down {
                            pos: *pos,
                            button: *button,
                        }
                    } else {
                        PointerEvent::Up {
                            pos: *pos,
                            button: *button,
                        }
                    }));
                }
                egui::Event::PointerGone => {
                    self.last_pointer_pos = None;
                }
                egui::Event::Key {
                    key, pressed: true, ..
                } => {
                    if let Some(command) = KeyCommand::from_key(*key) {
                        out.push(InputEvent::Key(command));
                    }
                }
                egui::Event::Text(text) => out.push(InputEvent::Text(text.clone())),
                _ => {}
            }
        }

        out
    }
}
