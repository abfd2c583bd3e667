use std::collections::HashSet;
pub use winit::event::MouseButton;

/// Pointer state for one update tick.
///
/// `mouse_pressed` holds buttons that went down since the last
/// [`InputState::clear_frame_state`], so a press is seen by exactly one tick.
/// `mouse_pos` is in logical frame pixels.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    pub mouse_pos: [f32; 2],
    pub mouse_held: HashSet<MouseButton>,
    pub mouse_pressed: HashSet<MouseButton>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a button going down. Repeated presses while held are ignored.
    pub fn press_mouse(&mut self, button: MouseButton) {
        if self.mouse_held.insert(button) {
            self.mouse_pressed.insert(button);
        }
    }

    pub fn release_mouse(&mut self, button: MouseButton) {
        self.mouse_held.remove(&button);
    }

    pub fn clear_frame_state(&mut self) {
        self.mouse_pressed.clear();
    }

    pub fn is_mouse_held(&self, button: MouseButton) -> bool { self.mouse_held.contains(&button) }
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool { self.mouse_pressed.contains(&button) }

    /// Convenience for tests and scripted input: move the pointer to `(x, y)`
    /// and press the left button.
    pub fn click(x: f32, y: f32) -> Self {
        let mut input = Self::new();
        input.mouse_pos = [x, y];
        input.press_mouse(MouseButton::Left);
        input
    }
}
