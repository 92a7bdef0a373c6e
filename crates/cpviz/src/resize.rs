#![forbid(unsafe_code)]

//! Resize decisions.
//!
//! [`ResizeController`] turns a viewport size into a [`ChartFrame`] and
//! decides whether it differs enough from the current one to be worth a
//! relayout. The relayout itself is performed by the plot, which owns the
//! scales and scene; the controller is only ever reached through
//! `&mut Plot`, so two resizes can never interleave.

use cpviz_core::geometry::Size;
use cpviz_layout::ChartFrame;

/// Chart-size changes at or below this many pixels (in both dimensions) are
/// ignored.
pub const RESIZE_THRESHOLD: f64 = 1.0;

/// Outcome of [`ResizeController::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeDecision {
    /// Within the threshold; nothing to do.
    Skip,
    /// Relayout for this frame, then [`ResizeController::commit`] it.
    Apply(ChartFrame),
}

#[derive(Debug, Clone)]
pub struct ResizeController {
    frame: ChartFrame,
    add_table: bool,
    legend: bool,
    threshold: f64,
}

impl ResizeController {
    pub fn new(initial: ChartFrame, add_table: bool, legend: bool) -> Self {
        Self {
            frame: initial,
            add_table,
            legend,
            threshold: RESIZE_THRESHOLD,
        }
    }

    /// Frame currently laid out.
    pub fn frame(&self) -> &ChartFrame {
        &self.frame
    }

    pub fn evaluate(&self, viewport: Size) -> ResizeDecision {
        let next = ChartFrame::compute(viewport, self.add_table, self.legend);
        if next.chart.within(&self.frame.chart, self.threshold) {
            tracing::debug!(
                width = viewport.width,
                height = viewport.height,
                skipped = true,
                "resize below threshold"
            );
            ResizeDecision::Skip
        } else {
            ResizeDecision::Apply(next)
        }
    }

    /// Record `frame` as laid out.
    pub fn commit(&mut self, frame: ChartFrame) {
        self.frame = frame;
    }
}
