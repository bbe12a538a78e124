//! Per-frame input snapshot
//!
//! Window and device events are folded into an [`InputState`] that
//! behaviors read during their update. Mouse-look motion only accumulates
//! while the right mouse button is held, so the cursor stays free for the
//! editor panels otherwise.

use std::collections::HashSet;

use winit::{
    event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

#[derive(Debug, Clone, Default)]
pub struct InputState {
    pressed: HashSet<KeyCode>,
    cursor: [f32; 2],
    look_delta: [f32; 2],
    look_held: bool,
    clicked: Option<[f32; 2]>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    pub fn press(&mut self, key: KeyCode) {
        self.pressed.insert(key);
    }

    pub fn release(&mut self, key: KeyCode) {
        self.pressed.remove(&key);
    }

    /// Cursor position in window pixels.
    pub fn cursor(&self) -> [f32; 2] {
        self.cursor
    }

    /// Mouse-look motion accumulated since the last [`end_frame`](Self::end_frame).
    pub fn look_delta(&self) -> [f32; 2] {
        self.look_delta
    }

    pub fn add_look_delta(&mut self, dx: f32, dy: f32) {
        self.look_delta[0] += dx;
        self.look_delta[1] += dy;
    }

    /// Cursor position of a left click this frame.
    pub fn clicked(&self) -> Option<[f32; 2]> {
        self.clicked
    }

    /// Moves the cursor to `at` and registers a left click there.
    pub fn click(&mut self, at: [f32; 2]) {
        self.cursor = at;
        self.clicked = Some(at);
    }

    pub fn process_key_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(code) = event.physical_key {
            match event.state {
                ElementState::Pressed => self.press(code),
                ElementState::Released => self.release(code),
            }
        }
    }

    pub fn process_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => self.process_key_event(event),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = [position.x as f32, position.y as f32];
            }
            WindowEvent::MouseInput { state, button, .. } => match button {
                MouseButton::Right => self.look_held = *state == ElementState::Pressed,
                MouseButton::Left if *state == ElementState::Pressed => {
                    self.clicked = Some(self.cursor);
                }
                _ => (),
            },
            WindowEvent::Focused(false) => {
                self.pressed.clear();
                self.look_held = false;
            }
            _ => (),
        }
    }

    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.look_held {
                self.add_look_delta(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    /// Clears the per-frame parts: look motion and clicks.
    pub fn end_frame(&mut self) {
        self.look_delta = [0.0, 0.0];
        self.clicked = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_press_and_release() {
        let mut input = InputState::new();
        input.press(KeyCode::KeyW);
        assert!(input.is_pressed(KeyCode::KeyW));
        input.release(KeyCode::KeyW);
        assert!(!input.is_pressed(KeyCode::KeyW));
    }

    #[test]
    fn test_look_motion_needs_right_button() {
        let mut input = InputState::new();
        input.process_device_event(&DeviceEvent::MouseMotion { delta: (4.0, 2.0) });
        assert_eq!(input.look_delta(), [0.0, 0.0]);

        input.look_held = true;
        input.process_device_event(&DeviceEvent::MouseMotion { delta: (4.0, 2.0) });
        input.process_device_event(&DeviceEvent::MouseMotion { delta: (1.0, -1.0) });
        assert_eq!(input.look_delta(), [5.0, 1.0]);

        input.end_frame();
        assert_eq!(input.look_delta(), [0.0, 0.0]);
    }
}
