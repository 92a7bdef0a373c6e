#![forbid(unsafe_code)]

//! Per-variable grid partition.
//!
//! `n` variables are laid out on `rows = floor(sqrt(n))` rows and
//! `cols = ceil(n / rows)` columns, row-major. Trailing cells beyond `n`
//! stay blank.
//!
//! Each cell is split into a title band (5% of the cell height) and a plot
//! area framed by fixed margins. The plot area reserves a rug band of
//! `rug_size * 10% * min(plot_area_width, plot_area_height)` along its left
//! and bottom edges; every cell shares the same rug length.
//!
//! [`GridLayout::compute_grid`] is a pure function of its inputs.

use cpviz_core::geometry::{Point, Sides};

/// Padding between the rug band and the first data position.
pub const RUG_GAP: f64 = 5.0;

/// Grid layout parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Margins around each cell's plot area (room for axes).
    pub margin: Sides,
    /// Rug size factor (`size_rugs`).
    pub rug_size: f64,
    /// Fraction of the cell height reserved for the title.
    pub title_fraction: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            margin: Sides::new(10.0, 10.0, 40.0, 40.0),
            rug_size: 1.0,
            title_fraction: 0.05,
        }
    }
}

impl GridLayout {
    #[must_use]
    pub fn margin(mut self, margin: Sides) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub fn rug_size(mut self, rug_size: f64) -> Self {
        self.rug_size = rug_size;
        self
    }

    /// Partition `available_width` x `available_height` for `variable_count`
    /// cells.
    pub fn compute_grid(
        &self,
        variable_count: usize,
        available_width: f64,
        available_height: f64,
    ) -> CellGeometry {
        if variable_count == 0 {
            return CellGeometry {
                margin: self.margin,
                ..CellGeometry::default()
            };
        }
        let rows = ((variable_count as f64).sqrt().floor() as usize).max(1);
        let cols = variable_count.div_ceil(rows);
        let cell_height = (available_height.max(0.0) / rows as f64).floor();
        let cell_width = (available_width.max(0.0) / cols as f64).floor();
        let title_height = cell_height * self.title_fraction;
        let plot_area_width = (cell_width - self.margin.horizontal_sum()).max(0.0);
        let plot_area_height =
            (cell_height * (1.0 - self.title_fraction) - self.margin.vertical_sum()).max(0.0);
        let rug_length =
            (self.rug_size * plot_area_height.min(plot_area_width) * 0.1).max(0.0);

        CellGeometry {
            rows,
            cols,
            cell_width,
            cell_height,
            plot_area_width,
            plot_area_height,
            rug_length,
            title_height,
            margin: self.margin,
        }
    }
}

/// Geometry shared by every cell of one plot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellGeometry {
    pub rows: usize,
    pub cols: usize,
    pub cell_width: f64,
    pub cell_height: f64,
    pub plot_area_width: f64,
    pub plot_area_height: f64,
    pub rug_length: f64,
    pub title_height: f64,
    pub margin: Sides,
}

impl CellGeometry {
    /// Number of grid slots (`rows * cols`), filled or not.
    pub fn slots(&self) -> usize {
        self.rows * self.cols
    }

    /// Top-left corner of cell `index`, row-major.
    pub fn cell_origin(&self, index: usize) -> Option<Point> {
        if index >= self.slots() {
            return None;
        }
        let row = index / self.cols;
        let col = index % self.cols;
        Some(Point::new(
            col as f64 * self.cell_width,
            row as f64 * self.cell_height,
        ))
    }

    /// Offset of the plot area inside a cell.
    pub fn plot_offset(&self) -> Point {
        Point::new(self.margin.left, self.title_height + self.margin.top)
    }

    /// Pixel range of a numeric horizontal axis: past the rug band to the
    /// right edge.
    pub fn x_range(&self) -> (f64, f64) {
        (
            (self.rug_length + RUG_GAP).round(),
            self.plot_area_width.round(),
        )
    }

    /// Pixel range of a categorical horizontal axis.
    pub fn point_range(&self) -> (f64, f64) {
        (self.rug_length.round(), self.plot_area_width.round())
    }

    /// Pixel range of the outcome axis, inverted (max outcome at the top).
    pub fn y_range(&self) -> (f64, f64) {
        (
            (self.plot_area_height - self.rug_length - RUG_GAP).round(),
            0.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_variable_is_one_cell() {
        let g = GridLayout::default().compute_grid(1, 600.0, 200.0);
        assert_eq!((g.rows, g.cols), (1, 1));
        assert_eq!(g.cell_width, 600.0);
        assert_eq!(g.cell_height, 200.0);
        assert_eq!(g.plot_area_width, 550.0);
        assert!((g.plot_area_height - 140.0).abs() < 1e-9);
        assert!((g.rug_length - 14.0).abs() < 1e-9);
    }

    #[test]
    fn rows_and_cols() {
        let layout = GridLayout::default();
        let shape = |n| {
            let g = layout.compute_grid(n, 1000.0, 1000.0);
            (g.rows, g.cols)
        };
        assert_eq!(shape(2), (1, 2));
        assert_eq!(shape(3), (1, 3));
        assert_eq!(shape(4), (2, 2));
        assert_eq!(shape(5), (2, 3));
        assert_eq!(shape(10), (3, 4));
    }

    #[test]
    fn leftover_cells_have_geometry() {
        let g = GridLayout::default().compute_grid(5, 900.0, 400.0);
        assert_eq!(g.slots(), 6);
        assert!(g.cell_origin(5).is_some());
        assert!(g.cell_origin(6).is_none());
        assert_eq!(g.cell_origin(4), Some(Point::new(300.0, 200.0)));
    }

    #[test]
    fn zero_variables_is_empty() {
        let g = GridLayout::default().compute_grid(0, 600.0, 400.0);
        assert_eq!(g.slots(), 0);
        assert!(g.cell_origin(0).is_none());
    }

    #[test]
    fn tiny_surface_clamps_to_zero() {
        let g = GridLayout::default().compute_grid(4, 30.0, 30.0);
        assert_eq!(g.plot_area_width, 0.0);
        assert_eq!(g.plot_area_height, 0.0);
        assert_eq!(g.rug_length, 0.0);
    }

    #[test]
    fn ranges_leave_room_for_rugs() {
        let g = GridLayout::default().compute_grid(1, 600.0, 200.0);
        assert_eq!(g.x_range(), (19.0, 550.0));
        assert_eq!(g.point_range(), (14.0, 550.0));
        assert_eq!(g.y_range(), (121.0, 0.0));
    }

    #[test]
    fn rug_size_scales_band() {
        let g = GridLayout::default()
            .rug_size(2.0)
            .compute_grid(1, 600.0, 200.0);
        assert!((g.rug_length - 28.0).abs() < 1e-9);
    }
}
