#![forbid(unsafe_code)]

//! Categorical point scale.

use super::linear::round_half_up;
use rustc_hash::FxHashMap;

/// Places an ordered list of categories at evenly spaced, whole-pixel
/// positions across a range, centered, with no outer padding. A single
/// category sits at the midpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct PointScale {
    domain: Vec<String>,
    index: FxHashMap<String, usize>,
    range: (f64, f64),
    start: f64,
    step: f64,
}

impl PointScale {
    pub fn new(domain: Vec<String>, range: (f64, f64)) -> Self {
        let index = domain
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        let mut scale = Self {
            domain,
            index,
            range,
            start: 0.0,
            step: 0.0,
        };
        scale.rescale();
        scale
    }

    fn rescale(&mut self) {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        let reverse = r1 < r0;
        let (lo, hi) = if reverse { (r1, r0) } else { (r0, r1) };
        let step = ((hi - lo) / (n - 1.0).max(1.0)).floor();
        let start = round_half_up(lo + (hi - lo - step * (n - 1.0).max(0.0)) * 0.5);
        if reverse {
            self.start = start + step * (n - 1.0).max(0.0);
            self.step = -step;
        } else {
            self.start = start;
            self.step = step;
        }
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Replace the output range; the category order is untouched.
    pub fn set_range(&mut self, range: (f64, f64)) {
        self.range = range;
        self.rescale();
    }

    /// Distance between neighbouring categories.
    pub fn step(&self) -> f64 {
        self.step.abs()
    }

    /// Position of `category`, `None` if it is not in the domain.
    pub fn apply(&self, category: &str) -> Option<f64> {
        self.index
            .get(category)
            .map(|&i| self.start + self.step * i as f64)
    }

    /// Ordinal position of `category` in the domain.
    pub fn ordinal(&self, category: &str) -> Option<usize> {
        self.index.get(category).copied()
    }
}
