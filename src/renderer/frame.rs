use glam::Vec2;
use image::{Rgba, RgbaImage, imageops};

use super::sprites::SpriteBank;

/// Which image a draw command uses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    /// Tile image by tileset-local id.
    Tile(u32),
    Coins,
    Actor,
}

/// Place `sprite` with its top-left corner at `position` (frame pixels).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub sprite: SpriteKey,
    pub position: Vec2,
}

const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Draw `commands` in order into a fresh `width` x `height` frame.
pub fn compose(width: u32, height: u32, commands: &[DrawCommand], sprites: &SpriteBank) -> RgbaImage {
    let mut frame = RgbaImage::new(width, height);
    compose_into(&mut frame, commands, sprites);
    frame
}

/// Clear `frame` to opaque black and draw `commands` over it, later
/// commands on top. Positions are floored to whole pixels and anything
/// outside the frame is clipped.
pub fn compose_into(frame: &mut RgbaImage, commands: &[DrawCommand], sprites: &SpriteBank) {
    frame.pixels_mut().for_each(|p| *p = CLEAR);
    for command in commands {
        // Missing tile images are rejected at load time.
        let Some(image) = sprites.get(command.sprite) else { continue };
        imageops::overlay(
            frame,
            image,
            command.position.x.floor() as i64,
            command.position.y.floor() as i64,
        );
    }
}
