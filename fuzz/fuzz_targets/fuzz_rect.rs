//! Fuzz target for rectangle algebra.

#![no_main]

use arbitrary::Arbitrary;
use ergonomic_user32::geometry::{Point, Rect};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    a: (i32, i32, i32, i32),
    b: (i32, i32, i32, i32),
    pt: (i32, i32),
}

fuzz_target!(|input: Input| {
    let a = Rect::new(input.a.0, input.a.1, input.a.2, input.a.3);
    let b = Rect::new(input.b.0, input.b.1, input.b.2, input.b.3);
    let pt = Point::new(input.pt.0, input.pt.1);

    if let Some(i) = a.intersect(&b) {
        assert!(!i.is_empty());
        assert_eq!(i.contains(pt), a.contains(pt) && b.contains(pt));
    } else {
        assert!(!(a.contains(pt) && b.contains(pt)));
    }

    match a.union(&b) {
        Some(u) => {
            if a.contains(pt) || b.contains(pt) {
                assert!(u.contains(pt));
            }
        }
        None => assert!(a.is_empty() && b.is_empty()),
    }

    if let Some(d) = a.subtract(&b) {
        assert!(a.contains(d.top_left()) || d.is_empty());
        assert!(d.left >= a.left && d.right <= a.right);
        assert!(d.top >= a.top && d.bottom <= a.bottom);
    }

    // Offsets wrap instead of overflowing.
    let _ = a.offset(input.pt.0, input.pt.1).inflate(input.b.0, input.b.1);
});
