//! Session status of a screenshot instance.
//!
//! ```text
//! pending ──► waitForImage ──► ready
//!    │             │             │
//!    └─────────────┴─────────────┴──► destroyed
//! ```
//!
//! Status only moves forward; `destroyed` absorbs everything. Work that needs
//! the source image is parked in a ready queue and handed back to the owner
//! when the status reaches `ready`.

use crate::export::ImageBlob;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    Pending,
    WaitForImage,
    Ready,
    Destroyed,
}

impl Status {
    pub fn name(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::WaitForImage => "waitForImage",
            Status::Ready => "ready",
            Status::Destroyed => "destroyed",
        }
    }
}

/// How a queued task combines with tasks already waiting for `ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueMode {
    /// Drop what is queued and keep only this task.
    Replace,
    /// Run after what is already queued.
    Append,
    /// Drop everything queued, including this task.
    Clear,
}

pub type ReadyCallback = Box<dyn FnMut()>;
pub type DestroyCallback = Box<dyn FnOnce(Option<ImageBlob>)>;

/// The status state machine plus its one-shot ready queue and notifications.
pub struct Lifecycle<T> {
    status: Status,
    ready_queue: Vec<T>,
    on_ready: Option<ReadyCallback>,
    on_destroy: Option<DestroyCallback>,
}

impl<T> std::fmt::Debug for Lifecycle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lifecycle")
            .field("status", &self.status)
            .field("queued", &self.ready_queue.len())
            .field("on_ready", &self.on_ready.is_some())
            .field("on_destroy", &self.on_destroy.is_some())
            .finish()
    }
}

impl<T> Default for Lifecycle<T> {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl<T> Lifecycle<T> {
    pub fn new(on_ready: Option<ReadyCallback>, on_destroy: Option<DestroyCallback>) -> Self {
        Self {
            status: Status::Pending,
            ready_queue: Vec::new(),
            on_ready,
            on_destroy,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == Status::Ready
    }

    pub fn is_destroyed(&self) -> bool {
        self.status == Status::Destroyed
    }

    pub fn queued(&self) -> usize {
        self.ready_queue.len()
    }

    /// Moves to `next`, returning the queued tasks when `ready` is reached.
    ///
    /// Backward moves are ignored and anything after `destroyed` is a no-op.
    /// Setting `destroyed` here behaves like [`Lifecycle::destroy`] without a payload.
    pub fn set_status(&mut self, next: Status) -> Vec<T> {
        if self.is_destroyed() {
            return Vec::new();
        }
        if next == Status::Destroyed {
            self.destroy(None);
            return Vec::new();
        }
        if next <= self.status {
            if next < self.status {
                log::warn!(
                    "ignoring status change {} -> {}",
                    self.status.name(),
                    next.name()
                );
            }
            return Vec::new();
        }

        log::info!("status {} -> {}", self.status.name(), next.name());
        self.status = next;

        if next == Status::Ready {
            if let Some(on_ready) = self.on_ready.as_mut() {
                on_ready();
            }
            return std::mem::take(&mut self.ready_queue);
        }
        Vec::new()
    }

    /// Parks `task` until `ready`; hands it straight back if already ready.
    pub fn when_ready(&mut self, task: T, mode: QueueMode) -> Option<T> {
        match self.status {
            Status::Destroyed => None,
            Status::Ready => match mode {
                QueueMode::Clear => None,
                QueueMode::Replace | QueueMode::Append => Some(task),
            },
            Status::Pending | Status::WaitForImage => {
                match mode {
                    QueueMode::Replace => {
                        self.ready_queue.clear();
                        self.ready_queue.push(task);
                    }
                    QueueMode::Append => self.ready_queue.push(task),
                    QueueMode::Clear => self.ready_queue.clear(),
                }
                None
            }
        }
    }

    /// Marks the session destroyed and fires the destroy notification.
    ///
    /// Returns `false` when it had already been destroyed, in which case
    /// nothing happens and `payload` is dropped.
    pub fn destroy(&mut self, payload: Option<ImageBlob>) -> bool {
        if self.is_destroyed() {
            return false;
        }
        log::info!("status {} -> destroyed", self.status.name());
        self.status = Status::Destroyed;
        self.ready_queue.clear();
        self.on_ready = None;
        if let Some(on_destroy) = self.on_destroy.take() {
            on_destroy(payload);
        }
        true
    }
}
