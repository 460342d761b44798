use egui::{Id, Rect};

/// Errors raised while constructing an instance or loading its image.
#[derive(Debug, thiserror::Error)]
pub enum SnipError {
    /// The host has no usable content box
    #[error("host must be a non-empty container, got {0:?}")]
    InvalidHost(Rect),
    /// Another live instance already owns the host
    #[error("host {0:?} is already bound to a screenshot instance")]
    HostAlreadyBound(Id),
    /// No image source was given
    #[error("an image source is required")]
    MissingImage,
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
    /// The decoded image has no pixels
    #[error("image has zero width or height")]
    EmptyImage,
    /// The deferred image sender went away without delivering
    #[error("image loading was cancelled")]
    LoadCancelled,
}

/// Errors raised while encoding or delivering the edited region.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("clipboard write failed: {0}")]
    Clipboard(String),
    /// The target does not exist on this platform
    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),
    /// The worker went away without reporting
    #[error("export was cancelled")]
    Cancelled,
}
