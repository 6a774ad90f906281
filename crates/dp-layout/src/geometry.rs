// ABOUTME: Rectangles and axes in layout units.
// ABOUTME: Band carving and gutter inflation used by the frame coordinator.

/// Direction along which a band is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Rectangle in layout units, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn extent(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.w,
            Axis::Y => self.h,
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Split off a band of `extent` from the front along `axis`, returning
    /// `(band, rest)`. Non-positive extents take everything. The band never
    /// exceeds the rectangle.
    pub fn take_front(&self, extent: i32, axis: Axis) -> (Rect, Rect) {
        let total = self.extent(axis);
        let extent = if extent <= 0 { total } else { extent.min(total) };
        match axis {
            Axis::X => (
                Rect::new(self.x, self.y, extent, self.h),
                Rect::new(self.x + extent, self.y, total - extent, self.h),
            ),
            Axis::Y => (
                Rect::new(self.x, self.y, self.w, extent),
                Rect::new(self.x, self.y + extent, self.w, total - extent),
            ),
        }
    }

    /// Grow by `margin` on both sides along `axis`
    pub fn inflate(&self, margin: i32, axis: Axis) -> Rect {
        match axis {
            Axis::X => Rect::new(self.x - margin, self.y, self.w + 2 * margin, self.h),
            Axis::Y => Rect::new(self.x, self.y - margin, self.w, self.h + 2 * margin),
        }
    }

    /// Shrink by `amount` on every side, saturating at an empty rect
    pub fn shrink(&self, amount: i32) -> Rect {
        Rect::new(
            self.x + amount,
            self.y + amount,
            (self.w - 2 * amount).max(0),
            (self.h - 2 * amount).max(0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_front_splits_along_axis() {
        let r = Rect::new(0, 0, 100, 50);
        let (band, rest) = r.take_front(30, Axis::Y);
        assert_eq!(band, Rect::new(0, 0, 100, 30));
        assert_eq!(rest, Rect::new(0, 30, 100, 20));

        let (band, rest) = r.take_front(40, Axis::X);
        assert_eq!(band, Rect::new(0, 0, 40, 50));
        assert_eq!(rest, Rect::new(40, 0, 60, 50));
    }

    #[test]
    fn take_front_clamps_and_takes_remainder() {
        let r = Rect::new(10, 10, 20, 20);
        let (band, rest) = r.take_front(500, Axis::Y);
        assert_eq!(band, r);
        assert!(rest.is_empty());

        let (band, rest) = r.take_front(0, Axis::X);
        assert_eq!(band, r);
        assert_eq!(rest.w, 0);
    }

    #[test]
    fn inflate_only_touches_one_axis() {
        let gutter = Rect::new(0, 100, 80, 2);
        assert_eq!(gutter.inflate(4, Axis::Y), Rect::new(0, 96, 80, 10));
        assert!(gutter.inflate(4, Axis::Y).contains(40, 97));
        assert!(!gutter.contains(40, 97));
    }
}
