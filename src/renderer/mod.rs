//! Drawing.
//!
//! A frame is composed on the CPU ([`frame::compose`]) from a list of draw
//! commands, so it can be built and inspected without a GPU. The
//! [`present::FramePresenter`] then puts that image on the window.

pub mod frame;
pub mod pipeline;
pub mod present;
pub mod sprites;
pub mod utils;

pub use frame::{DrawCommand, SpriteKey, compose, compose_into};
pub use present::FramePresenter;
pub use sprites::{SpriteBank, TileImages};
