mod resize_handle;
mod size_readout;
mod tool_button;
mod toolbar;

pub use resize_handle::ResizeHandle;
pub use size_readout::paint_size_readout;
pub use tool_button::ToolButton;
pub use toolbar::{Toolbar, ToolbarAction};
