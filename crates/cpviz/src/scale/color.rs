#![forbid(unsafe_code)]

//! Color encodings.
//!
//! Three implementations of [`ColorScale`]:
//!
//! - [`ConstantColor`]: no color variable, one color for everything.
//! - [`OrdinalColor`]: categorical variable, first-seen order, cycling
//!   through the qualitative palette.
//! - [`QuantizedColor`]: numeric variable binned into nice buckets labelled
//!   `"[a; b)"` (last bucket `"[a; b]"`), colored from a sequential palette.
//!
//! # Invariants (quantized)
//!
//! 1. Edges are strictly increasing, the first at or below the data minimum
//!    and the last at or above the data maximum.
//! 2. Membership is `lower <= v < upper`, except the last bucket which is
//!    closed; every value in range is in exactly one bucket.
//! 3. Values outside the edges clamp into the first or last bucket.
//! 4. `apply(v) == apply(bucket_label_for(v))`.

use super::ticks::{nice, range, round_to};
use crate::data::{Value, decimal_places};
use cpviz_render::Rgba;
use cpviz_style::{PAIRED, cycle, or_rd};
use rustc_hash::FxHashMap;
use std::fmt;

/// Which kind of color encoding is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Constant,
    Categorical,
    Quantized,
}

/// Color encoding contract shared by all layers and the legend.
pub trait ColorScale: fmt::Debug {
    /// Color for a raw value, or for one of the scale's own labels.
    fn apply(&self, value: &Value) -> Rgba;
    /// Ordered domain: categories or bucket labels.
    fn domain(&self) -> Vec<String>;
    /// Label of the category/bucket `value` falls in.
    fn bucket_label_for(&self, value: &Value) -> Option<String>;
    fn mode(&self) -> ColorMode;
}

// ---------------------------------------------------------------------------
// Constant
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ConstantColor {
    color: Rgba,
}

impl ConstantColor {
    pub fn new(color: Rgba) -> Self {
        Self { color }
    }
}

impl ColorScale for ConstantColor {
    fn apply(&self, _value: &Value) -> Rgba {
        self.color
    }

    fn domain(&self) -> Vec<String> {
        vec![self.color.to_hex()]
    }

    fn bucket_label_for(&self, _value: &Value) -> Option<String> {
        None
    }

    fn mode(&self) -> ColorMode {
        ColorMode::Constant
    }
}

// ---------------------------------------------------------------------------
// Ordinal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalColor {
    domain: Vec<String>,
    index: FxHashMap<String, usize>,
    fallback: Rgba,
}

impl OrdinalColor {
    /// Domain is the distinct values of `values` in first-seen order.
    pub fn new<'a>(values: impl IntoIterator<Item = &'a Value>, fallback: Rgba) -> Self {
        let mut domain = Vec::new();
        let mut index = FxHashMap::default();
        for v in values {
            if v.is_empty() {
                continue;
            }
            let key = v.to_string();
            if !index.contains_key(&key) {
                index.insert(key.clone(), domain.len());
                domain.push(key);
            }
        }
        Self {
            domain,
            index,
            fallback,
        }
    }
}

impl ColorScale for OrdinalColor {
    fn apply(&self, value: &Value) -> Rgba {
        self.index
            .get(&value.to_string())
            .and_then(|&i| cycle(&PAIRED, i))
            .unwrap_or(self.fallback)
    }

    fn domain(&self) -> Vec<String> {
        self.domain.clone()
    }

    fn bucket_label_for(&self, value: &Value) -> Option<String> {
        let key = value.to_string();
        self.index.contains_key(&key).then_some(key)
    }

    fn mode(&self) -> ColorMode {
        ColorMode::Categorical
    }
}

// ---------------------------------------------------------------------------
// Quantized
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedColor {
    edges: Vec<f64>,
    labels: Vec<String>,
    palette: Vec<Rgba>,
    fallback: Rgba,
}

impl QuantizedColor {
    /// Bin `[min, max]` into about `bucket_count` nice buckets.
    ///
    /// `bucket_count` is clamped to the 3..=9 classes of the sequential
    /// palette, so every bucket gets its own color.
    pub fn new(min: f64, max: f64, bucket_count: usize, fallback: Rgba) -> Self {
        let count = bucket_count.clamp(3, 9);
        let (lo, hi) = nice(min, max, 10.0);
        let width = (hi - lo) / count as f64;
        let diff = nice(0.0, width, 10.0).1;

        let mut edges = if hi > lo && diff > 0.0 && diff.is_finite() {
            let decimals = decimal_places(diff);
            let mut e = range(lo, hi, diff);
            e.push(hi);
            let mut e: Vec<f64> = e.into_iter().map(|v| round_to(v, decimals)).collect();
            e.dedup();
            if let Some(first) = e.first_mut() {
                *first = first.min(min);
            }
            if let Some(last) = e.last_mut() {
                *last = last.max(max);
            }
            while e.len() > 2 && e[e.len() - 2] > max {
                e.remove(e.len() - 2);
            }
            e
        } else {
            vec![min, max]
        };
        edges.dedup_by(|b, a| *b <= *a);
        if edges.len() < 2 {
            let v = edges.first().copied().unwrap_or(min);
            edges = vec![v, v];
        }

        let buckets = edges.len() - 1;
        let labels = (0..buckets)
            .map(|i| {
                let close = if i + 1 == buckets { ']' } else { ')' };
                format!("[{}; {}{close}", edges[i], edges[i + 1])
            })
            .collect();
        Self {
            edges,
            labels,
            palette: or_rd(count),
            fallback,
        }
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn bucket_count(&self) -> usize {
        self.labels.len()
    }

    /// Bucket holding `v`, clamping out-of-range values.
    pub fn bucket_index(&self, v: f64) -> usize {
        let last = self.bucket_count() - 1;
        (0..last).find(|&i| v < self.edges[i + 1]).unwrap_or(last)
    }

    /// Strict membership test, no clamping.
    pub fn bucket_contains(&self, bucket: usize, v: f64) -> bool {
        let last = self.bucket_count() - 1;
        match (self.edges.get(bucket), self.edges.get(bucket + 1)) {
            (Some(&lo), Some(&hi)) if bucket == last => lo <= v && v <= hi,
            (Some(&lo), Some(&hi)) => lo <= v && v < hi,
            _ => false,
        }
    }

    fn color_at(&self, bucket: usize) -> Rgba {
        cycle(&self.palette, bucket).unwrap_or(self.fallback)
    }
}

impl ColorScale for QuantizedColor {
    fn apply(&self, value: &Value) -> Rgba {
        match value {
            Value::Number(n) if n.is_finite() => self.color_at(self.bucket_index(*n)),
            Value::Text(label) => self
                .labels
                .iter()
                .position(|l| l == label)
                .map_or(self.fallback, |i| self.color_at(i)),
            _ => self.fallback,
        }
    }

    fn domain(&self) -> Vec<String> {
        self.labels.clone()
    }

    fn bucket_label_for(&self, value: &Value) -> Option<String> {
        match value {
            Value::Number(n) if n.is_finite() => {
                self.labels.get(self.bucket_index(*n)).cloned()
            }
            Value::Text(label) if self.labels.contains(label) => Some(label.clone()),
            _ => None,
        }
    }

    fn mode(&self) -> ColorMode {
        ColorMode::Quantized
    }
}
