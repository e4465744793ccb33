/// Axis-aligned integer rectangle, half-open on the max edge.
///
/// `min_x..max_x` by `min_y..max_y`, origin top-left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge (inclusive).
    pub min_x: i32,
    /// Top edge (inclusive).
    pub min_y: i32,
    /// Right edge (exclusive).
    pub max_x: i32,
    /// Bottom edge (exclusive).
    pub max_y: i32,
}

impl Rect {
    /// Rectangle from its corner coordinates, as given.
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Rectangle from a top-left corner and a size.
    pub const fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Horizontal extent.
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    /// Vertical extent.
    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    /// Area in pixels. Non-canonical rectangles report 0.
    pub fn area(&self) -> i64 {
        if self.is_empty() {
            return 0;
        }
        self.width() as i64 * self.height() as i64
    }

    /// `true` for zero-area or inverted rectangles.
    pub fn is_empty(&self) -> bool {
        self.min_x >= self.max_x || self.min_y >= self.max_y
    }

    /// Swap coordinates where needed so that min <= max on both axes.
    pub fn canon(self) -> Self {
        Self {
            min_x: self.min_x.min(self.max_x),
            min_y: self.min_y.min(self.max_y),
            max_x: self.min_x.max(self.max_x),
            max_y: self.min_y.max(self.max_y),
        }
    }

    /// Whether the pixel at `(x, y)` lies inside.
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        self.min_x <= x && x < self.max_x && self.min_y <= y && y < self.max_y
    }

    /// Full containment of `other`. An empty rectangle is contained in any
    /// rectangle, matching the usual subset semantics.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        if other.is_empty() {
            return true;
        }
        self.min_x <= other.min_x
            && other.max_x <= self.max_x
            && self.min_y <= other.min_y
            && other.max_y <= self.max_y
    }

    /// Overlapping region, or `None` when the rectangles are disjoint.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let r = Rect::new(
            self.min_x.max(other.min_x),
            self.min_y.max(other.min_y),
            self.max_x.min(other.max_x),
            self.max_y.min(other.max_y),
        );
        (!r.is_empty()).then_some(r)
    }

    /// Map a rectangle from prescaled space back to native resolution.
    ///
    /// All four coordinates are divided by the same factor and truncated
    /// toward zero.
    pub fn unscale(self, factor: f64) -> Self {
        if factor == 1.0 {
            return self.canon();
        }
        let map = |v: i32| (v as f64 / factor).trunc() as i32;
        Self::new(
            map(self.min_x),
            map(self.min_y),
            map(self.max_x),
            map(self.max_y),
        )
        .canon()
    }

    /// Map a native-resolution rectangle into prescaled space.
    pub fn scale(self, factor: f64) -> Self {
        if factor == 1.0 {
            return self.canon();
        }
        let map = |v: i32| (v as f64 * factor).trunc() as i32;
        Self::new(
            map(self.min_x),
            map(self.min_y),
            map(self.max_x),
            map(self.max_y),
        )
        .canon()
    }

    /// Clip into `0..width` by `0..height`.
    pub fn clamp_to(self, width: u32, height: u32) -> Self {
        let (w, h) = (width as i32, height as i32);
        let r = self.canon();
        Self::new(
            r.min_x.clamp(0, w),
            r.min_y.clamp(0, h),
            r.max_x.clamp(0, w),
            r.max_y.clamp(0, h),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canon_swaps_inverted_axes() {
        let r = Rect::new(10, 20, 0, 5).canon();
        assert_eq!(r, Rect::new(0, 5, 10, 20));
        assert_eq!(r.area(), 150);
    }

    #[test]
    fn area_of_degenerate_rect_is_zero() {
        assert_eq!(Rect::new(3, 3, 3, 9).area(), 0);
        assert_eq!(Rect::new(5, 0, 1, 1).area(), 0);
    }

    #[test]
    fn contains_point_is_half_open() {
        let r = Rect::new(0, 0, 4, 4);
        assert!(r.contains_point(0, 0));
        assert!(r.contains_point(3, 3));
        assert!(!r.contains_point(4, 0));
        assert!(!r.contains_point(0, 4));
    }

    #[test]
    fn contains_rect_requires_full_containment() {
        let outer = Rect::new(0, 0, 20, 10);
        assert!(outer.contains_rect(&Rect::new(0, 0, 10, 10)));
        assert!(outer.contains_rect(&outer));
        assert!(!outer.contains_rect(&Rect::new(15, 0, 25, 10)));
    }

    #[test]
    fn intersect_disjoint_is_none() {
        let a = Rect::new(0, 0, 5, 5);
        assert_eq!(a.intersect(&Rect::new(5, 0, 8, 5)), None);
        assert_eq!(
            a.intersect(&Rect::new(2, 2, 8, 8)),
            Some(Rect::new(2, 2, 5, 5))
        );
    }

    #[test]
    fn unscale_divides_every_coordinate_by_the_same_factor() {
        let r = Rect::new(40, 20, 140, 121).unscale(0.5);
        assert_eq!(r, Rect::new(80, 40, 280, 242));
    }

    #[test]
    fn unscale_identity() {
        let r = Rect::new(1, 2, 3, 4);
        assert_eq!(r.unscale(1.0), r);
    }

    #[test]
    fn clamp_to_image_bounds() {
        let r = Rect::new(-3, 2, 120, 90).clamp_to(100, 50);
        assert_eq!(r, Rect::new(0, 2, 100, 50));
    }
}
