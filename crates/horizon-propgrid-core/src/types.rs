//! Basic geometry, color and font types.
//!
//! All coordinates are logical pixels in `f32`. Rectangles are half-open:
//! a point on the right or bottom edge is outside.

use std::fmt;
use std::str::FromStr;

use crate::error::{ParseColorError, ParseFontError};

/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The origin point (0, 0).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Translate the point by the given amount.
    #[inline]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// A 2D size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Zero size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Check if the size is empty (zero or negative area).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Component-wise maximum of two sizes.
    #[inline]
    pub fn max(self, other: Size) -> Size {
        Size::new(self.width.max(other.width), self.height.max(other.height))
    }
}

impl From<(f32, f32)> for Size {
    fn from((width, height): (f32, f32)) -> Self {
        Self { width, height }
    }
}

/// A rectangle defined by origin and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    /// Create a new rectangle from origin and size.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    /// Create a rectangle from two corners (min and max points).
    #[inline]
    pub fn from_corners(min: Point, max: Point) -> Self {
        Self {
            origin: min,
            size: Size {
                width: max.x - min.x,
                height: max.y - min.y,
            },
        }
    }

    /// Empty rectangle at origin.
    pub const ZERO: Self = Self {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    #[inline]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.height
    }

    #[inline]
    pub fn top_left(&self) -> Point {
        self.origin
    }

    #[inline]
    pub fn top_right(&self) -> Point {
        Point::new(self.right(), self.top())
    }

    #[inline]
    pub fn bottom_left(&self) -> Point {
        Point::new(self.left(), self.bottom())
    }

    #[inline]
    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    /// Check if the rectangle is empty (zero or negative size).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Compute the intersection of two rectangles.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if left < right && top < bottom {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    /// Check whether two rectangles overlap.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersect(other).is_some()
    }

    /// Expand the rectangle by the given amount on all sides.
    #[inline]
    pub fn inflate(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(
            self.origin.x - dx,
            self.origin.y - dy,
            self.size.width + dx * 2.0,
            self.size.height + dy * 2.0,
        )
    }

    /// Shrink the rectangle by the given amount on all sides.
    #[inline]
    pub fn deflate(&self, dx: f32, dy: f32) -> Rect {
        self.inflate(-dx, -dy)
    }

    /// Offset the rectangle by the given amount.
    #[inline]
    pub fn offset(&self, dx: f32, dy: f32) -> Rect {
        Rect {
            origin: self.origin.offset(dx, dy),
            size: self.size,
        }
    }

    /// Move the right edge to `right`, keeping the left edge. Never produces
    /// a negative width.
    #[inline]
    pub fn with_right(&self, right: f32) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            (right - self.origin.x).max(0.0),
            self.size.height,
        )
    }

    /// The 2px band along the bottom edge used for row-resize grabbing.
    #[inline]
    pub fn bottom_band(&self, thickness: f32) -> Rect {
        Rect::new(
            self.left(),
            self.bottom() - thickness,
            self.width(),
            thickness,
        )
    }

    /// The band along the top edge.
    #[inline]
    pub fn top_band(&self, thickness: f32) -> Rect {
        Rect::new(self.left(), self.top(), self.width(), thickness)
    }
}

/// An RGBA color, straight (non-premultiplied) alpha, components in 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a new color from RGBA components (0.0-1.0 range).
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from RGB components.
    #[inline]
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from 8-bit RGBA components (0-255 range).
    #[inline]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Create an opaque color from 8-bit RGB components.
    #[inline]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba8(r, g, b, 255)
    }

    /// Create a color from a hex string (e.g., "#FF0000" or "#FF0000FF").
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        let len = hex.len();

        if (len != 6 && len != 8) || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        let a = if len == 8 {
            u8::from_str_radix(&hex[6..8], 16).ok()?
        } else {
            255
        };

        Some(Self::from_rgba8(r, g, b, a))
    }

    /// Convert to 8-bit RGBA components.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Format as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    pub const BLACK: Self = Self::from_rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::from_rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::from_rgb(1.0, 0.0, 0.0);
    pub const GRAY: Self = Self::from_rgb(0.5, 0.5, 0.5);
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s).ok_or_else(|| ParseColorError(s.to_string()))
    }
}

/// A toolkit-neutral font descriptor.
///
/// The textual form is `"<family> <size>[ bold][ italic][ underline]"`, for
/// example `"DejaVu Sans 10 bold"`. The family may contain spaces.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDesc {
    pub family: String,
    pub point_size: f32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl FontDesc {
    /// Create a regular-weight font.
    pub fn new(family: impl Into<String>, point_size: f32) -> Self {
        Self {
            family: family.into(),
            point_size,
            bold: false,
            italic: false,
            underline: false,
        }
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn underline(mut self, underline: bool) -> Self {
        self.underline = underline;
        self
    }
}

impl Default for FontDesc {
    fn default() -> Self {
        Self::new("Sans", 9.0)
    }
}

impl fmt::Display for FontDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.point_size)?;
        if self.bold {
            f.write_str(" bold")?;
        }
        if self.italic {
            f.write_str(" italic")?;
        }
        if self.underline {
            f.write_str(" underline")?;
        }
        Ok(())
    }
}

impl FromStr for FontDesc {
    type Err = ParseFontError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseFontError(s.to_string());
        let mut words: Vec<&str> = s.split_whitespace().collect();

        let (mut bold, mut italic, mut underline) = (false, false, false);
        while let Some(&last) = words.last() {
            match last.to_ascii_lowercase().as_str() {
                "bold" => bold = true,
                "italic" => italic = true,
                "underline" => underline = true,
                _ => break,
            }
            words.pop();
        }

        let size = words.pop().ok_or_else(err)?;
        let point_size: f32 = size.parse().map_err(|_| err())?;
        if !point_size.is_finite() || point_size <= 0.0 || words.is_empty() {
            return Err(err());
        }

        Ok(Self {
            family: words.join(" "),
            point_size,
            bold,
            italic,
            underline,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(r.contains(Point::new(9.9, 9.9)));
        assert!(!r.contains(Point::new(10.0, 5.0)));
        assert!(!r.contains(Point::new(5.0, 10.0)));
    }

    #[test]
    fn test_zero_width_rect_contains_nothing() {
        let r = Rect::new(50.0, 0.0, 0.0, 25.0);
        assert!(!r.contains(Point::new(50.0, 10.0)));
    }

    #[test]
    fn test_with_right_clamps() {
        let r = Rect::new(100.0, 0.0, 20.0, 10.0);
        assert_eq!(r.with_right(150.0).width(), 50.0);
        assert_eq!(r.with_right(50.0).width(), 0.0);
    }

    #[test]
    fn test_edge_bands() {
        let r = Rect::new(0.0, 26.0, 200.0, 25.0);
        assert_eq!(r.bottom_band(2.0), Rect::new(0.0, 49.0, 200.0, 2.0));
        assert_eq!(r.top_band(2.0), Rect::new(0.0, 26.0, 200.0, 2.0));
    }

    #[test]
    fn test_color_hex() {
        let c = Color::from_hex("#FF8000").unwrap();
        assert_eq!(c.to_rgba8(), [255, 128, 0, 255]);
        assert_eq!(c.to_hex(), "#FF8000");
        assert_eq!(Color::from_hex("#FF800080").unwrap().to_hex(), "#FF800080");
        assert!(Color::from_hex("#GG0000").is_none());
        assert!(Color::from_hex("#FFF").is_none());
        assert!("nope".parse::<Color>().is_err());
    }

    #[test]
    fn test_font_parse() {
        let f: FontDesc = "DejaVu Sans 10 bold italic".parse().unwrap();
        assert_eq!(f.family, "DejaVu Sans");
        assert_eq!(f.point_size, 10.0);
        assert!(f.bold && f.italic && !f.underline);
        assert_eq!(f.to_string(), "DejaVu Sans 10 bold italic");
    }

    #[test]
    fn test_font_parse_rejects_garbage() {
        assert!("".parse::<FontDesc>().is_err());
        assert!("12".parse::<FontDesc>().is_err());
        assert!("Arial big".parse::<FontDesc>().is_err());
        assert!("Arial -3".parse::<FontDesc>().is_err());
    }
}
