//! Screen rectangles
//!
//! Axis-aligned rectangles in device pixel space. Right and bottom edges are
//! exclusive, so `Rect::new(0, 0, 32, 32)` covers columns 0..32.

/// Axis-aligned rectangle in device pixels
///
/// A rectangle with zero or negative width or height is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub w: i32,
    /// Height in pixels
    pub h: i32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle anchored at the origin with the given size
    pub const fn with_size(w: i32, h: i32) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    /// Check if the rectangle covers no pixels
    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Exclusive right edge
    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Number of pixels covered (0 when empty)
    pub fn area(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            (self.w as u32).saturating_mul(self.h as u32)
        }
    }

    /// Intersect with `bounds`
    ///
    /// The result has non-negative width and height; it is empty when the two
    /// rectangles share no pixel.
    pub fn clamp_to(self, bounds: Rect) -> Rect {
        let x0 = self.x.max(bounds.x);
        let y0 = self.y.max(bounds.y);
        let x1 = self.right().min(bounds.right());
        let y1 = self.bottom().min(bounds.bottom());
        Rect::new(x0, y0, (x1 - x0).max(0), (y1 - y0).max(0))
    }

    /// Check if the rectangles share at least one pixel
    pub fn overlaps(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Check if the rectangles overlap or share an edge
    ///
    /// Two 32px boxes at x=100 and x=132 touch; at x=133 they do not.
    pub fn touches(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// Smallest rectangle containing both
    ///
    /// An empty operand is ignored.
    pub fn union(&self, other: Rect) -> Rect {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return *self;
        }

        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Check if a pixel lies inside the rectangle
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Rect = Rect::with_size(480, 320);

    #[test]
    fn test_empty() {
        assert!(Rect::new(0, 0, 0, 10).is_empty());
        assert!(Rect::new(0, 0, 10, -1).is_empty());
        assert!(!Rect::new(0, 0, 1, 1).is_empty());
        assert_eq!(Rect::new(5, 5, -3, 4).area(), 0);
    }

    #[test]
    fn test_clamp_partially_offscreen() {
        let top_left = Rect::new(-10, -5, 32, 32).clamp_to(SCREEN);
        assert_eq!(top_left, Rect::new(0, 0, 22, 27));

        let bottom_right = Rect::new(470, 300, 32, 32).clamp_to(SCREEN);
        assert_eq!(bottom_right, Rect::new(470, 300, 10, 20));
    }

    #[test]
    fn test_clamp_fully_offscreen_is_empty() {
        assert!(Rect::new(-40, 10, 32, 32).clamp_to(SCREEN).is_empty());
        assert!(Rect::new(10, 330, 32, 32).clamp_to(SCREEN).is_empty());
    }

    #[test]
    fn test_overlap_excludes_shared_edge() {
        let a = Rect::new(100, 100, 32, 32);
        assert!(a.overlaps(&Rect::new(110, 100, 32, 32)));
        assert!(!a.overlaps(&Rect::new(132, 100, 32, 32)));
        assert!(!a.overlaps(&Rect::new(100, 132, 32, 32)));
    }

    #[test]
    fn test_touch_includes_shared_edge() {
        let a = Rect::new(100, 100, 32, 32);
        assert!(a.touches(&Rect::new(132, 100, 32, 32)));
        assert!(a.touches(&Rect::new(100, 68, 32, 32)));
        assert!(!a.touches(&Rect::new(133, 100, 32, 32)));
        assert!(!a.touches(&Rect::new(100, 100, 0, 0)));
    }

    #[test]
    fn test_union() {
        let a = Rect::new(100, 100, 32, 32);
        let b = Rect::new(110, 100, 32, 32);
        assert_eq!(a.union(b), Rect::new(100, 100, 42, 32));
        assert_eq!(a.union(Rect::new(0, 0, 0, 0)), a);
        assert_eq!(Rect::default().union(b), b);
    }

    #[test]
    fn test_contains() {
        let a = Rect::new(10, 10, 2, 2);
        assert!(a.contains(10, 10));
        assert!(a.contains(11, 11));
        assert!(!a.contains(12, 10));
    }
}
