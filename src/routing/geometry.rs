//! Geometric primitives used by the edge router.

use serde::{Deserialize, Serialize};

/// Coordinates closer than this are treated as equal.
pub const EPSILON: f64 = 1e-6;

/// A 2D point in render space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }

    pub fn approx_eq(&self, other: Point) -> bool {
        (self.x - other.x).abs() < EPSILON && (self.y - other.y).abs() < EPSILON
    }

    pub fn lerp(&self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Open-interval overlap with `[x0, x1] x [y0, y1]`.
    pub fn overlaps_span(&self, x0: f64, x1: f64, y0: f64, y1: f64) -> bool {
        self.x < x1 && self.right() > x0 && self.y < y1 && self.bottom() > y0
    }
}

/// The rendered bounding box of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeBox {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NodeBox {
    pub fn new(id: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width,
            height,
        }
    }

    /// Box of the given size centered on a point.
    pub fn centered(id: impl Into<String>, center: Point, width: f64, height: f64) -> Self {
        Self::new(
            id,
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 5.0, 10.0, 20.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 30.0, 25.0));
    }

    #[test]
    fn test_overlaps_span_is_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.overlaps_span(5.0, 15.0, 5.0, 15.0));
        assert!(!r.overlaps_span(10.0, 20.0, 0.0, 10.0));
    }

    #[test]
    fn test_lerp_and_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(30.0, 40.0);
        assert_eq!(a.distance(b), 50.0);
        assert_eq!(a.lerp(b, 0.5), Point::new(15.0, 20.0));
    }

    #[test]
    fn test_centered_box() {
        let b = NodeBox::centered("z", Point::new(100.0, 100.0), 40.0, 20.0);
        assert_eq!(b.rect(), Rect::new(80.0, 90.0, 40.0, 20.0));
    }
}
