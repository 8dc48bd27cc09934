//! Rectangles and points.
//!
//! [`Rect`] and [`Point`] share the exact layout of the Win32 `RECT` and
//! `POINT` structures, so they are passed to user32 by address without
//! conversion. The rectangle algebra is implemented in Rust with the same
//! semantics as the user32 `*Rect` functions; the OS versions are available as
//! free functions on Windows.

/// A 2D coordinate, laid out like `POINT`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Point {
    /// Creates a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the point moved by `(dx, dy)`.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }
}

/// A width/height pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

/// An axis-aligned rectangle, laid out like `RECT`.
///
/// The right and bottom edges are exclusive: a point on them is outside.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// X coordinate of the upper-left corner.
    pub left: i32,
    /// Y coordinate of the upper-left corner.
    pub top: i32,
    /// X coordinate of the lower-right corner.
    pub right: i32,
    /// Y coordinate of the lower-right corner.
    pub bottom: i32,
}

impl Rect {
    /// Creates a rectangle from its four edges (`SetRect`).
    #[inline]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a rectangle from an origin and a size.
    #[inline]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(
            origin.x,
            origin.y,
            origin.x.wrapping_add(size.width),
            origin.y.wrapping_add(size.height),
        )
    }

    /// The all-zero rectangle (`SetRectEmpty`).
    #[inline]
    pub const fn empty() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Width, which is negative for inverted rectangles.
    #[inline]
    pub const fn width(&self) -> i32 {
        self.right.wrapping_sub(self.left)
    }

    /// Height, which is negative for inverted rectangles.
    #[inline]
    pub const fn height(&self) -> i32 {
        self.bottom.wrapping_sub(self.top)
    }

    /// Width and height.
    #[inline]
    pub const fn size(&self) -> Size {
        Size {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Upper-left corner.
    #[inline]
    pub const fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Lower-right corner (exclusive).
    #[inline]
    pub const fn bottom_right(&self) -> Point {
        Point::new(self.right, self.bottom)
    }

    /// Returns true if the rectangle has no area (`IsRectEmpty`).
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Returns true if `pt` lies inside the rectangle (`PtInRect`).
    #[inline]
    pub const fn contains(&self, pt: Point) -> bool {
        pt.x >= self.left && pt.x < self.right && pt.y >= self.top && pt.y < self.bottom
    }

    /// Returns the rectangle grown by `dx` on the left and right and `dy` on
    /// the top and bottom (`InflateRect`). Negative values shrink it.
    #[inline]
    pub const fn inflate(&self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.left.wrapping_sub(dx),
            self.top.wrapping_sub(dy),
            self.right.wrapping_add(dx),
            self.bottom.wrapping_add(dy),
        )
    }

    /// Returns the rectangle moved by `(dx, dy)` (`OffsetRect`).
    #[inline]
    pub const fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.left.wrapping_add(dx),
            self.top.wrapping_add(dy),
            self.right.wrapping_add(dx),
            self.bottom.wrapping_add(dy),
        )
    }

    /// Smallest rectangle containing both (`UnionRect`).
    ///
    /// An empty operand is ignored. Returns `None` when both are empty.
    pub fn union(&self, other: &Rect) -> Option<Rect> {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => None,
            (true, false) => Some(*other),
            (false, true) => Some(*self),
            (false, false) => Some(Rect::new(
                self.left.min(other.left),
                self.top.min(other.top),
                self.right.max(other.right),
                self.bottom.max(other.bottom),
            )),
        }
    }

    /// Overlap of the two rectangles (`IntersectRect`).
    ///
    /// Returns `None` when either is empty or they do not overlap.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        if self.is_empty()
            || other.is_empty()
            || self.left >= other.right
            || other.left >= self.right
            || self.top >= other.bottom
            || other.top >= self.bottom
        {
            return None;
        }

        Some(Rect::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        ))
    }

    /// Removes `other` from this rectangle (`SubtractRect`).
    ///
    /// The result stays a rectangle, so it only shrinks when `other` spans a
    /// full side. Returns `None` when nothing remains or `self` is empty.
    pub fn subtract(&self, other: &Rect) -> Option<Rect> {
        if self.is_empty() {
            return None;
        }

        let mut dest = *self;
        if let Some(overlap) = self.intersect(other) {
            if overlap == dest {
                return None;
            }
            if overlap.top == dest.top && overlap.bottom == dest.bottom {
                if overlap.left == dest.left {
                    dest.left = overlap.right;
                } else if overlap.right == dest.right {
                    dest.right = overlap.left;
                }
            } else if overlap.left == dest.left && overlap.right == dest.right {
                if overlap.top == dest.top {
                    dest.top = overlap.bottom;
                } else if overlap.bottom == dest.bottom {
                    dest.bottom = overlap.top;
                }
            }
        }
        Some(dest)
    }
}

#[cfg(windows)]
mod native {
    use super::{Point, Rect};
    use windows::Win32::Foundation::{POINT, RECT};

    impl From<RECT> for Rect {
        fn from(r: RECT) -> Self {
            Rect::new(r.left, r.top, r.right, r.bottom)
        }
    }

    impl From<Rect> for RECT {
        fn from(r: Rect) -> Self {
            RECT {
                left: r.left,
                top: r.top,
                right: r.right,
                bottom: r.bottom,
            }
        }
    }

    impl From<POINT> for Point {
        fn from(p: POINT) -> Self {
            Point::new(p.x, p.y)
        }
    }

    impl From<Point> for POINT {
        fn from(p: Point) -> Self {
            POINT { x: p.x, y: p.y }
        }
    }
}

#[cfg(windows)]
pub use self::os::*;

/// The user32 rectangle functions, called through the entry-point table.
#[cfg(windows)]
mod os {
    use super::{Point, Rect};
    use crate::marshal::from_native_bool;
    use crate::user32::User32;

    /// Fills `rect` with the given edges. Returns true on success.
    pub fn set_rect(rect: &mut Rect, left: i32, top: i32, right: i32, bottom: i32) -> bool {
        // SAFETY: `rect` is a valid, writable RECT-layout value.
        from_native_bool(unsafe { (User32::get().set_rect)(rect, left, top, right, bottom) })
    }

    /// Sets all four edges of `rect` to zero.
    pub fn set_rect_empty(rect: &mut Rect) -> bool {
        // SAFETY: `rect` is a valid, writable RECT-layout value.
        from_native_bool(unsafe { (User32::get().set_rect_empty)(rect) })
    }

    /// Copies `src` into `dst`.
    pub fn copy_rect(dst: &mut Rect, src: &Rect) -> bool {
        // SAFETY: both pointers come from references.
        from_native_bool(unsafe { (User32::get().copy_rect)(dst, src) })
    }

    /// Returns true if both rectangles have identical edges.
    pub fn equal_rect(a: &Rect, b: &Rect) -> bool {
        // SAFETY: both pointers come from references.
        from_native_bool(unsafe { (User32::get().equal_rect)(a, b) })
    }

    /// Grows or shrinks `rect` in place.
    pub fn inflate_rect(rect: &mut Rect, dx: i32, dy: i32) -> bool {
        // SAFETY: `rect` is a valid, writable RECT-layout value.
        from_native_bool(unsafe { (User32::get().inflate_rect)(rect, dx, dy) })
    }

    /// Moves `rect` in place.
    pub fn offset_rect(rect: &mut Rect, dx: i32, dy: i32) -> bool {
        // SAFETY: `rect` is a valid, writable RECT-layout value.
        from_native_bool(unsafe { (User32::get().offset_rect)(rect, dx, dy) })
    }

    /// Writes the overlap of `a` and `b` into `dst`; false (and an empty
    /// `dst`) when they do not overlap.
    pub fn intersect_rect(dst: &mut Rect, a: &Rect, b: &Rect) -> bool {
        // SAFETY: all pointers come from references.
        from_native_bool(unsafe { (User32::get().intersect_rect)(dst, a, b) })
    }

    /// Writes the bounding rectangle of `a` and `b` into `dst`.
    pub fn union_rect(dst: &mut Rect, a: &Rect, b: &Rect) -> bool {
        // SAFETY: all pointers come from references.
        from_native_bool(unsafe { (User32::get().union_rect)(dst, a, b) })
    }

    /// Writes `a` minus `b` into `dst`.
    pub fn subtract_rect(dst: &mut Rect, a: &Rect, b: &Rect) -> bool {
        // SAFETY: all pointers come from references.
        from_native_bool(unsafe { (User32::get().subtract_rect)(dst, a, b) })
    }

    /// Returns true if `rect` has no area.
    pub fn is_rect_empty(rect: &Rect) -> bool {
        // SAFETY: the pointer comes from a reference.
        from_native_bool(unsafe { (User32::get().is_rect_empty)(rect) })
    }

    /// Returns true if `pt` lies inside `rect`.
    pub fn pt_in_rect(rect: &Rect, pt: Point) -> bool {
        // SAFETY: the pointer comes from a reference; POINT is passed by value.
        from_native_bool(unsafe { (User32::get().pt_in_rect)(rect, pt) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_layout_matches_win32() {
        assert_eq!(std::mem::size_of::<Rect>(), 16);
        assert_eq!(std::mem::size_of::<Point>(), 8);
        assert_eq!(std::mem::offset_of!(Rect, left), 0);
        assert_eq!(std::mem::offset_of!(Rect, top), 4);
        assert_eq!(std::mem::offset_of!(Rect, right), 8);
        assert_eq!(std::mem::offset_of!(Rect, bottom), 12);
    }

    #[test]
    fn test_set_rect_scenario() {
        let r = Rect::new(0, 0, 100, 50);
        assert!(!r.is_empty());
        assert_eq!(r.width(), 100);
        assert_eq!(r.height(), 50);
        assert_eq!(r.size(), Size { width: 100, height: 50 });
    }

    #[test]
    fn test_contains_is_half_open() {
        let r = Rect::new(10, 10, 20, 20);
        assert!(r.contains(Point::new(10, 10)));
        assert!(r.contains(Point::new(19, 19)));
        assert!(!r.contains(Point::new(20, 19)));
        assert!(!r.contains(Point::new(19, 20)));
    }

    #[test]
    fn test_union_ignores_empty_operand() {
        let a = Rect::new(0, 0, 10, 10);
        let empty = Rect::new(50, 50, 50, 60);
        assert_eq!(a.union(&empty), Some(a));
        assert_eq!(empty.union(&a), Some(a));
        assert_eq!(empty.union(&Rect::empty()), None);
    }

    #[test]
    fn test_intersect_disjoint() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 20, 10);
        assert_eq!(a.intersect(&b), None);
        assert_eq!(
            a.intersect(&Rect::new(5, 5, 15, 15)),
            Some(Rect::new(5, 5, 10, 10))
        );
    }

    #[test]
    fn test_subtract_full_side() {
        let a = Rect::new(0, 0, 100, 100);
        // Covers the left half across the full height.
        assert_eq!(
            a.subtract(&Rect::new(-10, -10, 40, 200)),
            Some(Rect::new(40, 0, 100, 100))
        );
        // Covers the bottom strip across the full width.
        assert_eq!(
            a.subtract(&Rect::new(0, 80, 100, 100)),
            Some(Rect::new(0, 0, 100, 80))
        );
        // A hole in the middle cannot be expressed; nothing changes.
        assert_eq!(a.subtract(&Rect::new(10, 10, 20, 20)), Some(a));
        // Fully covered.
        assert_eq!(a.subtract(&Rect::new(-1, -1, 101, 101)), None);
    }

    #[test]
    fn test_inflate_and_offset() {
        let r = Rect::new(10, 10, 20, 20);
        assert_eq!(r.inflate(5, 2), Rect::new(5, 8, 25, 22));
        assert!(r.inflate(-5, -5).is_empty());
        assert_eq!(r.offset(-10, 5), Rect::new(0, 15, 10, 25));
        assert_eq!(Point::new(1, 2).offset(3, 4), Point::new(4, 6));
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (-500i32..500, -500i32..500, -500i32..500, -500i32..500)
            .prop_map(|(l, t, r, b)| Rect::new(l, t, r, b))
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-600i32..600, -600i32..600).prop_map(|(x, y)| Point::new(x, y))
    }

    proptest! {
        #[test]
        fn prop_union_contains_both(a in rect_strategy(), b in rect_strategy(), p in point_strategy()) {
            if a.contains(p) || b.contains(p) {
                let u = a.union(&b).expect("a non-empty operand contains p");
                prop_assert!(u.contains(p));
            }
        }

        #[test]
        fn prop_intersect_only_common(a in rect_strategy(), b in rect_strategy(), p in point_strategy()) {
            match a.intersect(&b) {
                Some(i) => prop_assert_eq!(i.contains(p), a.contains(p) && b.contains(p)),
                None => prop_assert!(!(a.contains(p) && b.contains(p))),
            }
        }

        #[test]
        fn prop_is_empty_definition(r in rect_strategy()) {
            prop_assert_eq!(r.is_empty(), r.right <= r.left || r.bottom <= r.top);
        }

        #[test]
        fn prop_subtract_never_grows(a in rect_strategy(), b in rect_strategy(), p in point_strategy()) {
            if let Some(d) = a.subtract(&b) {
                if d.contains(p) {
                    prop_assert!(a.contains(p));
                }
            }
        }
    }

    #[cfg(windows)]
    mod os {
        use super::super::*;

        #[test]
        fn test_os_set_rect_scenario() {
            let mut r = Rect::default();
            assert!(set_rect(&mut r, 0, 0, 100, 50));
            assert!(!is_rect_empty(&r));
            assert_eq!(r.right - r.left, 100);
            assert_eq!(r.bottom - r.top, 50);
        }

        #[test]
        fn test_os_copy_then_equal() {
            let src = Rect::new(3, 4, 30, 40);
            let mut dst = Rect::default();
            assert!(copy_rect(&mut dst, &src));
            assert!(equal_rect(&dst, &src));
        }

        #[test]
        fn test_os_agrees_with_pure() {
            let a = Rect::new(0, 0, 100, 100);
            let b = Rect::new(50, -20, 150, 60);

            let mut dst = Rect::default();
            assert!(union_rect(&mut dst, &a, &b));
            assert_eq!(Some(dst), a.union(&b));

            assert!(intersect_rect(&mut dst, &a, &b));
            assert_eq!(Some(dst), a.intersect(&b));

            let strip = Rect::new(0, 80, 100, 120);
            assert!(subtract_rect(&mut dst, &a, &strip));
            assert_eq!(Some(dst), a.subtract(&strip));

            let mut moved = a;
            assert!(offset_rect(&mut moved, 7, -3));
            assert_eq!(moved, a.offset(7, -3));

            let mut grown = a;
            assert!(inflate_rect(&mut grown, 2, 4));
            assert_eq!(grown, a.inflate(2, 4));

            assert!(pt_in_rect(&a, Point::new(0, 0)));
            assert!(!pt_in_rect(&a, Point::new(100, 0)));

            assert!(set_rect_empty(&mut grown));
            assert!(is_rect_empty(&grown));
        }

        #[test]
        fn test_os_intersect_disjoint_empties_dst() {
            let mut dst = Rect::new(1, 1, 2, 2);
            assert!(!intersect_rect(
                &mut dst,
                &Rect::new(0, 0, 10, 10),
                &Rect::new(20, 20, 30, 30)
            ));
            assert!(dst.is_empty());
        }
    }
}
