//! Integer pixel rectangles

use super::math::{Vec2, Vec2I};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixel coordinates (top-left origin, y down)
///
/// A rectangle with zero width or height is empty. `Rect2I::default()` is the
/// canonical empty rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect2I {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect2I {
    /// The canonical empty rectangle
    pub const EMPTY: Self = Self {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    /// Create a rectangle from its origin and size
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Smallest integer rectangle covering the float corners `min`..`max`
    pub fn from_corners(min: Vec2, max: Vec2) -> Self {
        let x0 = min.x.min(max.x).floor() as i32;
        let y0 = min.y.min(max.y).floor() as i32;
        let x1 = min.x.max(max.x).ceil() as i32;
        let y1 = min.y.max(max.y).ceil() as i32;
        Self::new(x0, y0, x1.abs_diff(x0), y1.abs_diff(y0))
    }

    /// Whether the rectangle covers no pixels
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge
    pub const fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Top-left corner
    pub fn origin(&self) -> Vec2I {
        Vec2I::new(self.x, self.y)
    }

    /// Width and height
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The four corners, clockwise from top-left
    pub fn corners(&self) -> [Vec2; 4] {
        let (x0, y0) = (self.x as f32, self.y as f32);
        let (x1, y1) = (self.right() as f32, self.bottom() as f32);
        [
            Vec2::new(x0, y0),
            Vec2::new(x1, y0),
            Vec2::new(x1, y1),
            Vec2::new(x0, y1),
        ]
    }

    /// Whether a point lies inside (right/bottom edges exclusive)
    pub fn contains(&self, point: Vec2I) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Whether `other` fits entirely inside this rectangle
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Whether the two rectangles share at least one pixel
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Smallest rectangle covering both; empty rectangles are ignored
    pub fn union(&self, other: &Self) -> Self {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }

        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(x, y, right.abs_diff(x), bottom.abs_diff(y))
    }

    /// Same size, moved by `(dx, dy)`
    pub const fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(Rect2I::default().is_empty());
        assert_eq!(Rect2I::default(), Rect2I::EMPTY);
    }

    #[test]
    fn test_union_ignores_empty() {
        let r = Rect2I::new(10, 10, 5, 5);
        assert_eq!(r.union(&Rect2I::EMPTY), r);
        assert_eq!(Rect2I::new(100, 100, 0, 3).union(&r), r);
    }

    #[test]
    fn test_union_covers_both() {
        let a = Rect2I::new(0, 0, 10, 10);
        let b = Rect2I::new(20, -5, 5, 5);
        assert_eq!(a.union(&b), Rect2I::new(0, -5, 25, 15));
    }

    #[test]
    fn test_contains_edges() {
        let r = Rect2I::new(0, 0, 10, 10);
        assert!(r.contains(Vec2I::new(0, 0)));
        assert!(r.contains(Vec2I::new(9, 9)));
        assert!(!r.contains(Vec2I::new(10, 5)));
        assert!(!r.contains(Vec2I::new(-1, 5)));
    }

    #[test]
    fn test_from_corners_rounds_outward() {
        let r = Rect2I::from_corners(Vec2::new(0.5, 1.5), Vec2::new(10.2, 3.0));
        assert_eq!(r, Rect2I::new(0, 1, 11, 2));
    }

    #[test]
    fn test_overlaps() {
        let a = Rect2I::new(0, 0, 10, 10);
        assert!(a.overlaps(&Rect2I::new(5, 5, 10, 10)));
        assert!(!a.overlaps(&Rect2I::new(10, 0, 5, 5)));
    }
}
