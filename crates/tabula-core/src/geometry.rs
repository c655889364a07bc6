/// Axis-aligned rectangle in page points, top-left origin.
///
/// Stored as `top`, `left`, `width`, `height`. Negative extents are legal
/// and are never normalised: a rectangle built from a `bottom` above its `top`
/// keeps its negative height all the way to the extractors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rectangle {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Build from edge coordinates: `width = right - left`, `height = bottom - top`.
    pub fn from_edges(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self::new(top, left, right - left, bottom - top)
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Centre point as `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Whether the point lies inside the rectangle (edges inclusive).
    ///
    /// A rectangle with a negative extent contains no points.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }

    /// Compute the union of two rectangles.
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        let top = self.top.min(other.top);
        let left = self.left.min(other.left);
        let bottom = self.bottom().max(other.bottom());
        let right = self.right().max(other.right());
        Rectangle::from_edges(top, left, bottom, right)
    }
}

/// Orientation of a ruling line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// An axis-aligned ruling line on a page.
///
/// Horizontal rulings have `top == bottom`; vertical rulings have `x0 == x1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ruling {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl Ruling {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0: x0.min(x1),
            top: top.min(bottom),
            x1: x0.max(x1),
            bottom: top.max(bottom),
        }
    }

    /// A vertical ruling at `x` spanning `top..bottom`.
    pub fn vertical(x: f64, top: f64, bottom: f64) -> Self {
        Self::new(x, top, x, bottom)
    }

    /// A horizontal ruling at `y` spanning `x0..x1`.
    pub fn horizontal(y: f64, x0: f64, x1: f64) -> Self {
        Self::new(x0, y, x1, y)
    }

    /// Orientation, or `None` for a diagonal segment.
    pub fn orientation(&self) -> Option<Orientation> {
        let dx = self.x1 - self.x0;
        let dy = self.bottom - self.top;
        if dy.abs() < 1e-6 && dx > 0.0 {
            Some(Orientation::Horizontal)
        } else if dx.abs() < 1e-6 && dy > 0.0 {
            Some(Orientation::Vertical)
        } else {
            None
        }
    }

    pub fn length(&self) -> f64 {
        (self.x1 - self.x0).max(self.bottom - self.top)
    }

    /// Clip the ruling to `area`. Returns `None` when nothing of it remains.
    pub fn clip(&self, area: &Rectangle) -> Option<Ruling> {
        let x0 = self.x0.max(area.left);
        let x1 = self.x1.min(area.right());
        let top = self.top.max(area.top);
        let bottom = self.bottom.min(area.bottom());
        if x0 > x1 || top > bottom {
            return None;
        }
        Some(Ruling { x0, top, x1, bottom })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_edges_computes_extent() {
        let r = Rectangle::from_edges(150.56, 58.9, 654.7, 536.12);
        assert_eq!(r.top, 150.56);
        assert_eq!(r.left, 58.9);
        assert!((r.width - (536.12 - 58.9)).abs() < 1e-9);
        assert!((r.height - (654.7 - 150.56)).abs() < 1e-9);
    }

    #[test]
    fn from_edges_keeps_negative_extent() {
        let r = Rectangle::from_edges(100.0, 50.0, 20.0, 10.0);
        assert_eq!(r.width, -40.0);
        assert_eq!(r.height, -80.0);
        assert!(!r.contains_point(30.0, 60.0));
    }

    #[test]
    fn right_and_bottom() {
        let r = Rectangle::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.right(), 50.0);
        assert_eq!(r.bottom(), 50.0);
        assert_eq!(r.center(), (35.0, 30.0));
    }

    #[test]
    fn union_covers_both() {
        let a = Rectangle::from_edges(20.0, 10.0, 40.0, 30.0);
        let b = Rectangle::from_edges(25.0, 5.0, 45.0, 35.0);
        let u = a.union(&b);
        assert_eq!(u, Rectangle::from_edges(20.0, 5.0, 45.0, 35.0));
    }

    #[test]
    fn ruling_orientation() {
        assert_eq!(
            Ruling::horizontal(10.0, 0.0, 100.0).orientation(),
            Some(Orientation::Horizontal)
        );
        assert_eq!(
            Ruling::vertical(10.0, 0.0, 100.0).orientation(),
            Some(Orientation::Vertical)
        );
        assert_eq!(Ruling::new(0.0, 0.0, 10.0, 10.0).orientation(), None);
    }

    #[test]
    fn ruling_clip() {
        let area = Rectangle::from_edges(0.0, 0.0, 50.0, 50.0);
        let clipped = Ruling::horizontal(10.0, -20.0, 80.0).clip(&area).unwrap();
        assert_eq!(clipped, Ruling::horizontal(10.0, 0.0, 50.0));
        assert!(Ruling::horizontal(60.0, 0.0, 10.0).clip(&area).is_none());
    }
}
