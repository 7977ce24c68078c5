use glam::{Vec2, Vec3};
use hashbrown::HashMap;

use crate::event::{ElementState, Event, EventSubscriber, Key, MouseButton};

#[derive(Default)]
pub struct InputState {
    keyboard: HashMap<Key, bool>,
    mouse_button: HashMap<MouseButton, bool>,
    mouse_position: Vec2,
}

impl InputState {
    pub fn new() -> InputState {
        InputState::default()
    }

    pub fn is_key_down(&self, keycode: &Key) -> bool {
        *self.keyboard.get(keycode).unwrap_or(&false)
    }

    pub fn is_mouse_down(&self, button: &MouseButton) -> bool {
        *self.mouse_button.get(button).unwrap_or(&false)
    }

    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Axis picked by a held X, Y or Z key. A drag with one held rotates instead of translating.
    pub fn rotate_axis(&self) -> Option<Vec3> {
        [(Key::X, Vec3::X), (Key::Y, Vec3::Y), (Key::Z, Vec3::Z)]
            .into_iter()
            .find(|(key, _)| self.is_key_down(key))
            .map(|(_, axis)| axis)
    }
}

impl EventSubscriber for InputState {
    fn on_event(&mut self, event: &Event) -> bool {
        match event {
            Event::KeyboardInput { keycode, state } => {
                self.keyboard.insert(*keycode, *state == ElementState::Pressed);
            }
            Event::MouseInput { mousecode, state, position } => {
                self.mouse_button.insert(*mousecode, *state == ElementState::Pressed);
                self.mouse_position = *position;
            }
            Event::CursorMoved { position } => {
                self.mouse_position = *position;
            }
            _ => {}
        }

        false
    }
}
