//! Screen Geometry
//!
//! Integer pixel geometry in the kiosk's logical screen space. Frontends map
//! these pixels onto whatever their display actually is.

use serde::{Deserialize, Serialize};

/// A position in logical screen pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position, growing rightwards
    pub x: i32,
    /// Vertical position, growing downwards
    pub y: i32,
}

impl Point {
    /// Create a point
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Shift this point by a horizontal offset
    #[must_use]
    pub const fn offset_x(self, dx: i32) -> Self {
        Self::new(self.x + dx, self.y)
    }
}

/// A width/height pair in logical pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Size {
    /// Create a size
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A square size
    #[must_use]
    pub const fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    /// Uniformly scale both dimensions, truncating towards zero
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(
            (self.width as f32 * factor) as u32,
            (self.height as f32 * factor) as u32,
        )
    }
}

/// An axis-aligned rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle of `size` whose center sits on `center`
    #[must_use]
    pub fn centered_at(center: Point, size: Size) -> Self {
        Self::new(
            center.x - (size.width / 2) as i32,
            center.y - (size.height / 2) as i32,
            size.width,
            size.height,
        )
    }

    /// Top-left corner
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Center point (rounded down)
    #[must_use]
    pub const fn center(&self) -> Point {
        Point::new(
            self.x + (self.width / 2) as i32,
            self.y + (self.height / 2) as i32,
        )
    }

    /// Exclusive right edge
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Exclusive bottom edge
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Whether `point` lies inside (left/top inclusive, right/bottom exclusive)
    #[must_use]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_half_open() {
        let rect = Rect::new(50, 285, 150, 150);
        assert!(rect.contains(Point::new(50, 285)));
        assert!(rect.contains(Point::new(199, 434)));
        assert!(!rect.contains(Point::new(200, 300)));
        assert!(!rect.contains(Point::new(10, 10)));
    }

    #[test]
    fn test_centered_at_round_trips_center() {
        let rect = Rect::centered_at(Point::new(125, 360), Size::square(220));
        assert_eq!(rect.origin(), Point::new(15, 250));
        assert_eq!(rect.center(), Point::new(125, 360));
    }

    #[test]
    fn test_scaled_truncates() {
        assert_eq!(Size::new(720, 720).scaled(0.75), Size::new(540, 540));
        assert_eq!(Size::new(3, 3).scaled(0.5), Size::new(1, 1));
    }
}
