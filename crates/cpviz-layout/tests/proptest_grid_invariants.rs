//! Property tests for the grid partition.
//!
//! 1. `compute_grid` is idempotent: identical inputs, identical geometry.
//! 2. There are always at least as many slots as variables, and never a
//!    whole spare row.
//! 3. Cells tile inside the available area.
//! 4. The rug band never exceeds 10% * rug_size of the smaller plot side.
//! 5. Axis ranges are ordered (numeric left-to-right, outcome top-down
//!    inverted).

use cpviz_layout::GridLayout;
use proptest::prelude::*;

proptest! {
    #[test]
    fn compute_grid_idempotent(n in 0usize..64, w in 0.0f64..4000.0, h in 0.0f64..4000.0, rug in 0.0f64..4.0) {
        let layout = GridLayout::default().rug_size(rug);
        prop_assert_eq!(layout.compute_grid(n, w, h), layout.compute_grid(n, w, h));
    }

    #[test]
    fn slots_cover_variables(n in 1usize..200) {
        let g = GridLayout::default().compute_grid(n, 1000.0, 1000.0);
        prop_assert!(g.slots() >= n);
        prop_assert!(g.slots() - n < g.cols);
    }

    #[test]
    fn cells_fit_available_area(n in 1usize..64, w in 0.0f64..4000.0, h in 0.0f64..4000.0) {
        let g = GridLayout::default().compute_grid(n, w, h);
        for i in 0..g.slots() {
            let o = g.cell_origin(i).expect("slot in range");
            prop_assert!(o.x + g.cell_width <= w + 1e-9);
            prop_assert!(o.y + g.cell_height <= h + 1e-9);
        }
    }

    #[test]
    fn rug_band_bounded(n in 1usize..64, w in 0.0f64..4000.0, h in 0.0f64..4000.0, rug in 0.0f64..4.0) {
        let g = GridLayout::default().rug_size(rug).compute_grid(n, w, h);
        let bound = rug * 0.1 * g.plot_area_width.min(g.plot_area_height);
        prop_assert!(g.rug_length <= bound + 1e-9);
        prop_assert!(g.rug_length >= 0.0);
    }

    #[test]
    fn outcome_range_inverted(n in 1usize..16, w in 200.0f64..4000.0, h in 400.0f64..4000.0) {
        let g = GridLayout::default().compute_grid(n, w, h);
        let (bottom, top) = g.y_range();
        prop_assert!(top <= bottom || g.plot_area_height < 10.0);
    }
}
