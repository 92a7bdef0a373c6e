//! Property-based invariant tests for the f64 geometry primitives.
//!
//! 1. Union is commutative and contains both inputs, corners included.
//! 2. `Size::within` is symmetric.

use cpviz_core::geometry::{Point, Rect, Size};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (-500.0f64..500.0, -500.0f64..500.0, 0.0f64..500.0, 0.0f64..500.0)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

proptest! {
    #[test]
    fn union_commutative_and_covering(a in rect_strategy(), b in rect_strategy()) {
        let u = a.union(&b);
        prop_assert_eq!(u, b.union(&a));
        for r in [a, b] {
            prop_assert!(u.contains(Point::new(r.x, r.y)));
            prop_assert!(u.contains(Point::new(r.right(), r.bottom())));
        }
    }

    #[test]
    fn within_is_symmetric(
        w1 in 0.0f64..2000.0, h1 in 0.0f64..2000.0,
        w2 in 0.0f64..2000.0, h2 in 0.0f64..2000.0,
    ) {
        let a = Size::new(w1, h1);
        let b = Size::new(w2, h2);
        prop_assert_eq!(a.within(&b, 1.0), b.within(&a, 1.0));
    }
}
