use serde::{Deserialize, Serialize};

/// Linear RGBA colour handed to the draw backend.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const GREY: Color = Color::rgb(0.5, 0.5, 0.5);
    pub const LIGHT_GREY: Color = Color::rgb(0.75, 0.75, 0.75);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const DARK_GREEN: Color = Color::rgb(0.0, 0.39, 0.0);
    pub const LIGHT_PINK: Color = Color::rgb(1.0, 0.71, 0.76);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color { r, g, b, a: 1.0 }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::GREY
    }
}
