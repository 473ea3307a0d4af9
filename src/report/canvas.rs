//! Drawing surface used by the report renderer.
//!
//! Coordinates are PDF points with the origin in the bottom-left corner.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const GREY: Color = Color::rgb(120, 113, 108);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
}

pub const PALETTE: [Color; 10] = [
    Color::rgb(54, 162, 235),
    Color::rgb(255, 99, 132),
    Color::rgb(255, 206, 86),
    Color::rgb(75, 192, 192),
    Color::rgb(153, 102, 255),
    Color::rgb(255, 159, 64),
    Color::rgb(46, 204, 113),
    Color::rgb(231, 76, 60),
    Color::rgb(52, 73, 94),
    Color::rgb(149, 165, 166),
];

/// Palette colour for the `index`-th value, cycling when the palette runs out.
pub fn palette_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

pub trait Canvas {
    /// (width, height) of every page.
    fn page_size(&self) -> (f32, f32);

    /// Finish the current page and start an empty one.
    fn new_page(&mut self);

    fn text(&mut self, x: f32, y: f32, size: f32, font: Font, color: Color, text: &str);

    fn fill_polygon(&mut self, points: &[(f32, f32)], color: Color);

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.fill_polygon(
            &[(x, y), (x + width, y), (x + width, y + height), (x, y + height)],
            color,
        );
    }

    /// Approximate rendered width of `text`, used for centring labels.
    fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * 0.5
    }
}
