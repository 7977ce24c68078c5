use std::path::PathBuf;

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementState {
    Pressed,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Keys the editor reacts to. Everything else arrives as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Key1,
    Key2,
    J,
    P,
    R,
    S,
    L,
    I,
    X,
    Y,
    Z,
    Backspace,
    Delete,
    Other(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Resized { width: u32, height: u32 },
    DroppedFile(PathBuf),
    KeyboardInput { keycode: Key, state: ElementState },
    CursorMoved { position: Vec2 },
    MouseInput { mousecode: MouseButton, state: ElementState, position: Vec2 },
}

pub trait EventSubscriber {
    /// Returns true when the event was consumed.
    fn on_event(&mut self, event: &Event) -> bool;
}
