//! Screen geometry
//!
//! Rectangles are stored edge-wise (left, top, right, bottom) because that is
//! how the window manager hands them to us during non-client calculation, and
//! the frame adjuster mutates edges in place.

use serde::{Deserialize, Serialize};

/// A point in screen or window-local coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate a screen point into coordinates relative to `origin`
    pub const fn relative_to(self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }

    /// Physical pixels to logical units at `ratio` physical pixels per unit
    pub fn to_logical(self, ratio: f64) -> Point {
        Point::new(physical_to_logical(self.x, ratio), physical_to_logical(self.y, ratio))
    }
}

fn physical_to_logical(value: i32, ratio: f64) -> i32 {
    (f64::from(value) / ratio).floor() as i32
}

/// Width/height pair in logical units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn to_logical(self, ratio: f64) -> Size {
        Size::new(
            physical_to_logical(self.width, ratio),
            physical_to_logical(self.height, ratio),
        )
    }
}

/// Edge-wise rectangle; `right`/`bottom` are exclusive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Build a rectangle from an origin and a size
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            left: origin.x,
            top: origin.y,
            right: origin.x + size.width,
            bottom: origin.y + size.height,
        }
    }

    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub const fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }

    /// Move every edge inward by `amount`
    pub fn shrink(&mut self, amount: i32) {
        self.left += amount;
        self.top += amount;
        self.right -= amount;
        self.bottom -= amount;
    }

    /// Move every edge outward by `amount`
    pub fn grow(&mut self, amount: i32) {
        self.shrink(-amount);
    }
}

impl From<[i32; 4]> for Rect {
    fn from([left, top, right, bottom]: [i32; 4]) -> Self {
        Self::new(left, top, right, bottom)
    }
}
