//! # Rendering boundary
//!
//! The runtime does not draw anything itself. Render-capable components
//! receive a [`Canvas`], a minimal 2D drawing surface implemented by
//! whatever backend the application plugs in (a window renderer, an
//! off-screen buffer, a logger in headless runs).

/// RGBA colour, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Color {
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque red
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Opaque green
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    /// Opaque blue
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    /// Opaque colour
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Colour with alpha
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Axis-aligned rectangle in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Create a rectangle of the given size centred on a point
    pub fn centered(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self::new(cx - w * 0.5, cy - h * 0.5, w, h)
    }
}

/// Drawing surface handed to [`Renderable`](crate::component::Renderable) components
///
/// All primitives use the colour set by the last [`Canvas::set_draw_color`].
pub trait Canvas {
    /// Set the colour for subsequent primitives
    fn set_draw_color(&mut self, color: Color);

    /// Fill the whole surface with the draw colour
    fn clear(&mut self);

    /// Show the finished frame
    fn present(&mut self);

    /// Draw a single point
    fn draw_point(&mut self, x: f32, y: f32);

    /// Draw a line segment
    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32);

    /// Draw a rectangle outline
    fn draw_rect(&mut self, rect: Rect);

    /// Draw a filled rectangle
    fn fill_rect(&mut self, rect: Rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        assert_eq!(Rect::centered(10.0, 10.0, 4.0, 2.0), Rect::new(8.0, 9.0, 4.0, 2.0));
    }

    #[test]
    fn test_rgb_is_opaque() {
        assert_eq!(Color::rgb(1, 2, 3).a, 255);
        assert_eq!(Color::default(), Color::BLACK);
    }
}
