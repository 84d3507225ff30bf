//! Keyboard shortcuts and pointer controls.
//!
//! | Input              | Command                               |
//! |--------------------|---------------------------------------|
//! | left drag          | rotate camera                         |
//! | right drag         | pan camera                            |
//! | middle drag        | move camera over the ground           |
//! | wheel              | zoom                                  |
//! | `D`                | toggle the debug grid/wireframe       |
//! | `L`                | toggle Phong shading (raster)         |
//! | `1` / `2` / `3`    | solid / raster / debug pipeline       |

use facet_core::{Controller, InputState, KeyCode};
use facet_renderer::{PipelineKind, RendererCommand};

pub struct KeyBindings {
    controller: Controller,
    debug_overlay: bool,
    phong: bool,
}

impl KeyBindings {
    pub fn new(controller: Controller, debug_overlay: bool, phong: bool) -> Self {
        Self {
            controller,
            debug_overlay,
            phong,
        }
    }

    /// Drains `input` into renderer commands: toggles first, then camera
    /// motion.
    pub fn commands(&mut self, input: &mut InputState) -> Vec<RendererCommand> {
        let mut out = Vec::new();

        if input.take_key_press(KeyCode::KeyD) {
            self.debug_overlay = !self.debug_overlay;
            out.push(RendererCommand::SetDebugMode(self.debug_overlay));
        }
        if input.take_key_press(KeyCode::KeyL) {
            self.phong = !self.phong;
            out.push(RendererCommand::TogglePhongShading(self.phong));
        }
        for (key, kind) in [
            (KeyCode::Digit1, PipelineKind::SolidColor),
            (KeyCode::Digit2, PipelineKind::Raster),
            (KeyCode::Digit3, PipelineKind::DebugWireframe),
        ] {
            if input.take_key_press(key) {
                out.push(RendererCommand::SetActivePipeline(kind));
            }
        }

        out.extend(
            self.controller
                .actions(input)
                .into_iter()
                .map(RendererCommand::Camera),
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_core::{CameraAction, MouseButton};

    fn press(input: &mut InputState, key: KeyCode) {
        input.update_key(key, true);
        input.update_key(key, false);
    }

    #[test]
    fn toggles_flip_their_state() {
        let mut b = KeyBindings::new(Controller::new(), false, true);
        let mut input = InputState::new();
        press(&mut input, KeyCode::KeyD);
        press(&mut input, KeyCode::KeyL);
        assert_eq!(
            b.commands(&mut input),
            vec![
                RendererCommand::SetDebugMode(true),
                RendererCommand::TogglePhongShading(false)
            ]
        );
        press(&mut input, KeyCode::KeyD);
        assert_eq!(
            b.commands(&mut input),
            vec![RendererCommand::SetDebugMode(false)]
        );
    }

    #[test]
    fn digits_select_pipelines() {
        let mut b = KeyBindings::new(Controller::new(), false, true);
        let mut input = InputState::new();
        press(&mut input, KeyCode::Digit2);
        assert_eq!(
            b.commands(&mut input),
            vec![RendererCommand::SetActivePipeline(PipelineKind::Raster)]
        );
        assert!(b.commands(&mut input).is_empty());
    }

    #[test]
    fn drags_become_camera_commands() {
        let mut b = KeyBindings::new(Controller::new().with_drag_scale(1.0), false, true);
        let mut input = InputState::new();
        input.set_mouse_position(0.0, 0.0);
        input.update_mouse_button(MouseButton::Right, true);
        input.set_mouse_position(3.0, -2.0);
        assert_eq!(
            b.commands(&mut input),
            vec![RendererCommand::Camera(CameraAction::Pan { h: 3.0, v: -2.0 })]
        );
    }
}
