pub mod config;

pub use config::WindowConfig;

use winit::dpi::LogicalSize;
use winit::window::{Window, WindowAttributes};

/// Attributes for the demo window: fixed size, not resizable.
///
/// The size is requested in logical units so the map keeps one map pixel per
/// logical pixel on HiDPI screens; the renderer scales the frame up to the
/// physical surface.
pub fn window_attributes(config: &WindowConfig, title: &str) -> WindowAttributes {
    Window::default_attributes()
        .with_title(title)
        .with_inner_size(LogicalSize::new(config.logical_width, config.logical_height))
        .with_resizable(false)
}
