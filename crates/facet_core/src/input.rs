use std::collections::HashSet;

pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

/// Keyboard and pointer state between two frames.
///
/// The window runner feeds winit events in; the camera controller and the
/// key bindings read it back out.  Pointer motion and wheel input are
/// accumulated until consumed so no drag is lost when several events arrive
/// per frame.
#[derive(Default)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    mouse_buttons: HashSet<MouseButton>,
    mouse_pos: Option<(f64, f64)>,
    mouse_delta: (f32, f32),
    scroll_lines: f32,
}

impl InputState {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn update_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            // auto-repeat does not count as a fresh press
            if self.keys_down.insert(key) {
                self.keys_pressed.insert(key);
            }
        } else {
            self.keys_down.remove(&key);
        }
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// True once per physical press; clears the flag.
    pub fn take_key_press(&mut self, key: KeyCode) -> bool {
        self.keys_pressed.remove(&key)
    }

    pub fn update_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.mouse_buttons.insert(button);
        } else {
            self.mouse_buttons.remove(&button);
        }
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    /// Records the cursor position (window pixels).  The first sample only
    /// seeds the position; later ones accumulate motion.
    pub fn set_mouse_position(&mut self, x: f64, y: f64) {
        if let Some((px, py)) = self.mouse_pos {
            self.mouse_delta.0 += (x - px) as f32;
            self.mouse_delta.1 += (y - py) as f32;
        }
        self.mouse_pos = Some((x, y));
    }

    pub fn mouse_position(&self) -> Option<(f64, f64)> {
        self.mouse_pos
    }

    /// Returns and resets the pointer motion since the last call.
    pub fn consume_mouse_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.mouse_delta)
    }

    /// Adds wheel motion in lines (pixel deltas are converted by the caller).
    pub fn add_scroll(&mut self, lines: f32) {
        self.scroll_lines += lines;
    }

    pub fn consume_scroll(&mut self) -> f32 {
        std::mem::take(&mut self.scroll_lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_tracking() {
        let mut state = InputState::new();
        assert!(!state.is_key_pressed(KeyCode::KeyD));
        state.update_key(KeyCode::KeyD, true);
        state.update_key(KeyCode::KeyD, true);
        assert!(state.is_key_pressed(KeyCode::KeyD));
        assert!(state.take_key_press(KeyCode::KeyD));
        // the repeated press did not queue a second toggle
        assert!(!state.take_key_press(KeyCode::KeyD));
        state.update_key(KeyCode::KeyD, false);
        assert!(!state.is_key_pressed(KeyCode::KeyD));
    }

    #[test]
    fn mouse_tracking() {
        let mut state = InputState::new();
        state.update_mouse_button(MouseButton::Left, true);
        assert!(state.is_button_down(MouseButton::Left));
        state.update_mouse_button(MouseButton::Left, false);
        assert!(!state.is_button_down(MouseButton::Left));

        state.set_mouse_position(10.0, 20.0);
        assert_eq!(state.consume_mouse_delta(), (0.0, 0.0));
        state.set_mouse_position(15.0, 25.0);
        state.set_mouse_position(20.0, 22.0);
        assert_eq!(state.consume_mouse_delta(), (10.0, 2.0));
        assert_eq!(state.consume_mouse_delta(), (0.0, 0.0));
        assert_eq!(state.mouse_position(), Some((20.0, 22.0)));
    }

    #[test]
    fn scroll_accumulates() {
        let mut state = InputState::new();
        state.add_scroll(1.0);
        state.add_scroll(-0.25);
        assert_eq!(state.consume_scroll(), 0.75);
        assert_eq!(state.consume_scroll(), 0.0);
    }
}
