#![forbid(unsafe_code)]

//! Geometric primitives in drawing-surface pixels.
//!
//! Coordinates are `f64`, origin at the top-left, y growing downwards.

/// A point on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by the given offsets.
    #[inline]
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Width and height of a surface or region.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when both dimensions are within `threshold` of `other`.
    ///
    /// Used to discard sub-pixel layout churn.
    #[inline]
    pub fn within(&self, other: &Size, threshold: f64) -> bool {
        (self.width - other.width).abs() <= threshold
            && (self.height - other.height).abs() <= threshold
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning two corner points in any order.
    pub fn from_points(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(x, y, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if a point lies inside the rectangle (edges inclusive).
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Grow the rectangle by `amount` on every side.
    #[must_use]
    pub fn inflate(&self, amount: f64) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.width + 2.0 * amount,
            self.height + 2.0 * amount,
        )
    }

    /// Smallest rectangle containing both.
    ///
    /// The far edges of the result never round below either input's edges.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, span(x, right), span(y, bottom))
    }
}

/// Extent from `start` such that `start + extent >= end`.
fn span(start: f64, end: f64) -> f64 {
    let mut extent = end - start;
    while extent.is_finite() && start + extent < end {
        extent = extent.next_up();
    }
    extent
}

/// Per-side spacing (margins).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sides {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Sides {
    /// Explicit spacing, CSS order.
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    #[inline]
    pub fn horizontal_sum(&self) -> f64 {
        self.left + self.right
    }

    #[inline]
    pub fn vertical_sum(&self) -> f64 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_edges() {
        let r = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(15.0, 15.0)));
        assert!(!r.contains(Point::new(15.1, 12.0)));
        assert!(!r.contains(Point::new(9.9, 12.0)));
    }

    #[test]
    fn rect_from_points_normalizes() {
        let r = Rect::from_points(Point::new(5.0, 8.0), Point::new(1.0, 2.0));
        assert_eq!(r, Rect::new(1.0, 2.0, 4.0, 6.0));
    }

    #[test]
    fn union_of_disjoint_rects() {
        let a = Rect::new(0.0, 0.0, 5.0, 5.0);
        let b = Rect::new(6.0, 6.0, 2.0, 2.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 8.0, 8.0));
    }

    #[test]
    fn union_keeps_far_corner_despite_rounding() {
        // -483.309 + (380.367 + 483.309) rounds below 380.367.
        let a = Rect::new(-483.309, 0.0, 7.28, 1.0);
        let b = Rect::new(255.587, 0.0, 124.78, 1.0);
        let u = a.union(&b);
        assert!(u.right() >= b.right());
        assert!(u.contains(Point::new(b.right(), b.bottom())));
        assert_eq!(u, b.union(&a));
    }

    #[test]
    fn size_within_threshold() {
        let a = Size::new(600.0, 400.0);
        assert!(a.within(&Size::new(600.9, 399.2), 1.0));
        assert!(!a.within(&Size::new(602.0, 400.0), 1.0));
    }

    #[test]
    fn sides_sums() {
        let s = Sides::new(10.0, 10.0, 40.0, 40.0);
        assert_eq!(s.horizontal_sum(), 50.0);
        assert_eq!(s.vertical_sum(), 50.0);
    }
}
