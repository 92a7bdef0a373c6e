#![forbid(unsafe_code)]

//! Continuous linear scale.

use super::ticks;

/// Maps `[d0, d1]` linearly onto `[r0, r1]`, rounding outputs to whole
/// pixels.
///
/// A degenerate domain (`d0 == d1`) maps every input to the middle of the
/// range.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Replace the output range. The domain never changes after
    /// construction.
    pub fn set_range(&mut self, range: (f64, f64)) {
        self.range = range;
    }

    /// Map a domain value to a pixel position.
    pub fn apply(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let t = if d1 == d0 { 0.5 } else { (v - d0) / (d1 - d0) };
        round_half_up(r0 + t * (r1 - r0))
    }

    /// About `count` nice tick values across the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks::ticks(self.domain.0, self.domain.1, count)
    }
}

/// Round to the nearest integer, halves towards +infinity.
pub(crate) fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}
