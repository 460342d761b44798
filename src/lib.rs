#![warn(clippy::all, rust_2018_idioms)]

pub mod annotation;
pub mod app;
pub mod capture;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod image;
pub mod input;
pub mod lifecycle;
pub mod selection;
pub mod widget;
pub mod widgets;

pub use annotation::{AnnotationSession, DrawingSurface, ObjectCanvas, ToolKind};
pub use app::SnipApp;
pub use capture::{CaptureOptions, PositionedImage, capture_element, merge_images, merge_images_blob};
pub use config::{SnipCallbacks, SnipOptions};
pub use error::{ExportError, SnipError};
pub use export::ImageBlob;
pub use geometry::CropRect;
pub use self::image::ImageSource;
pub use lifecycle::Status;
pub use selection::SelectionController;
pub use widget::{Host, Snip};
