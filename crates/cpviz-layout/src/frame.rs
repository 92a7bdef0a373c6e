#![forbid(unsafe_code)]

//! Viewport framing: chart area, plot area and legend strip.

use cpviz_core::geometry::{Rect, Size};

/// Share of the chart width given to the plot grid when a legend is shown.
pub const PLOT_SHARE_WITH_LEGEND: f64 = 0.8;

/// How the viewport is divided.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChartFrame {
    /// Visible chart size (the table, if any, takes the rest of the viewport).
    pub chart: Size,
    /// Width handed to the grid.
    pub plot_width: f64,
    /// Width of the legend strip right of the grid (0 when absent).
    pub legend_width: f64,
    /// Height left for the companion table (0 when absent).
    pub table_height: f64,
}

impl ChartFrame {
    /// Frame for `viewport`. With a table the chart gets half the height.
    pub fn compute(viewport: Size, add_table: bool, legend: bool) -> Self {
        let width = viewport.width.max(0.0);
        let height = viewport.height.max(0.0);
        let chart_height = if add_table { height / 2.0 } else { height };
        let plot_width = if legend {
            width * PLOT_SHARE_WITH_LEGEND
        } else {
            width
        };
        Self {
            chart: Size::new(width, chart_height),
            plot_width,
            legend_width: width - plot_width,
            table_height: height - chart_height,
        }
    }

    /// Frame whose chart area is exactly `chart`, as configured by the
    /// caller before any viewport measurement.
    pub fn for_chart(chart: Size, add_table: bool, legend: bool) -> Self {
        let viewport_height = if add_table {
            chart.height * 2.0
        } else {
            chart.height
        };
        Self::compute(Size::new(chart.width, viewport_height), add_table, legend)
    }

    /// Rectangle of the legend strip.
    pub fn legend_rect(&self) -> Rect {
        Rect::new(self.plot_width, 0.0, self.legend_width, self.chart.height)
    }

    /// Rectangle of the companion table below the chart.
    pub fn table_rect(&self) -> Rect {
        Rect::new(0.0, self.chart.height, self.chart.width, self.table_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_chart_keeps_chart_size() {
        let f = ChartFrame::for_chart(Size::new(600.0, 400.0), true, true);
        assert_eq!(f.chart, Size::new(600.0, 400.0));
        assert_eq!(f.table_height, 400.0);
        assert_eq!(f.plot_width, 480.0);
    }

    #[test]
    fn table_halves_height() {
        let f = ChartFrame::compute(Size::new(600.0, 400.0), true, false);
        assert_eq!(f.chart, Size::new(600.0, 200.0));
        assert_eq!(f.table_height, 200.0);
        assert_eq!(f.plot_width, 600.0);
        assert_eq!(f.legend_width, 0.0);
    }

    #[test]
    fn legend_takes_a_fifth() {
        let f = ChartFrame::compute(Size::new(1000.0, 400.0), false, true);
        assert_eq!(f.chart.height, 400.0);
        assert_eq!(f.plot_width, 800.0);
        assert_eq!(f.legend_width, 200.0);
        assert_eq!(f.legend_rect(), Rect::new(800.0, 0.0, 200.0, 400.0));
        assert_eq!(f.table_rect().height, 0.0);
    }
}
