use crate::input::{InputState, MouseButton};
use crate::scene::camera::CameraAction;

/// Turns raw pointer input into [`CameraAction`]s.
///
/// | Input               | Action           |
/// |---------------------|------------------|
/// | left-button drag    | `Rotate`         |
/// | right-button drag   | `Pan`            |
/// | middle-button drag  | `Move`           |
/// | wheel               | `Zoom`           |
///
/// # Example
/// ```rust,ignore
/// let controller = Controller::new().with_drag_scale(0.005);
/// for action in controller.actions(&mut input) {
///     camera.apply(action);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Controller {
    /// World units (or radians) per dragged pixel.
    ///
    /// Default: `0.01`
    pub drag_scale: f32,

    /// Zoom distance per wheel line.
    ///
    /// Default: `0.5`
    pub zoom_step: f32,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    pub fn new() -> Self {
        Self {
            drag_scale: 0.01,
            zoom_step: 0.5,
        }
    }

    pub fn with_drag_scale(mut self, drag_scale: f32) -> Self {
        self.drag_scale = drag_scale;
        self
    }

    /// Maps a drag of `(dx, dy)` pixels with `button` held.  Buttons without
    /// a binding yield `None`.
    pub fn drag(&self, button: MouseButton, dx: f32, dy: f32) -> Option<CameraAction> {
        let (h, v) = (dx * self.drag_scale, dy * self.drag_scale);
        match button {
            MouseButton::Left => Some(CameraAction::Rotate { h, v }),
            MouseButton::Right => Some(CameraAction::Pan { h, v }),
            MouseButton::Middle => Some(CameraAction::Move { h, v }),
            _ => None,
        }
    }

    /// Wheel lines scrolled away from the user zoom in.
    pub fn scroll(&self, lines: f32) -> CameraAction {
        CameraAction::Zoom(lines * self.zoom_step)
    }

    /// Drains the pointer deltas accumulated in `input` and returns the
    /// resulting actions, in drag-then-zoom order.
    pub fn actions(&self, input: &mut InputState) -> Vec<CameraAction> {
        let mut out = Vec::new();
        let (dx, dy) = input.consume_mouse_delta();
        if dx != 0.0 || dy != 0.0 {
            // one binding at a time; left wins over right over middle
            let held = [MouseButton::Left, MouseButton::Right, MouseButton::Middle]
                .into_iter()
                .find(|b| input.is_button_down(*b));
            if let Some(action) = held.and_then(|b| self.drag(b, dx, dy)) {
                out.push(action);
            }
        }
        let lines = input.consume_scroll();
        if lines != 0.0 {
            out.push(self.scroll(lines));
        }
        out
    }
}
