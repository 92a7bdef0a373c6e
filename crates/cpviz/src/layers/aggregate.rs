#![forbid(unsafe_code)]

//! Aggregated (partial dependence) profiles.

use super::{Anchor, CellContext, Datum, LayerKind, LayerRenderer, LayerSink, NodeKind};
use crate::data::{LABEL_COLUMN, Value};
use crate::options::{Aggregate, LayerStyle};
use cpviz_render::{Paint, Rgba};
use rustc_hash::FxHashMap;

/// One line per model: profile predictions reduced per grid value.
#[derive(Debug, Clone, Copy)]
pub struct AggregateLayer {
    aggregate: Aggregate,
    style: LayerStyle,
    color: Rgba,
}

/// Reduced profile of one model: `(grid value, reduced prediction)` in
/// axis order.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelProfile {
    pub model: String,
    pub points: Vec<(Value, f64)>,
}

impl AggregateLayer {
    pub fn new(aggregate: Aggregate, style: LayerStyle, color: Rgba) -> Self {
        Self {
            aggregate,
            style,
            color,
        }
    }

    /// Group the cell's points by model, then grid value, and reduce.
    pub fn reduce(&self, cx: &CellContext<'_>) -> Vec<ModelProfile> {
        let mut models: Vec<(String, Vec<(Value, Vec<f64>)>)> = Vec::new();
        let mut model_slots: FxHashMap<&str, usize> = FxHashMap::default();
        let mut value_slots: Vec<FxHashMap<String, usize>> = Vec::new();
        for p in &cx.points {
            if p.value.is_empty() {
                continue;
            }
            let m = *model_slots.entry(p.model_label.as_str()).or_insert_with(|| {
                models.push((p.model_label.clone(), Vec::new()));
                value_slots.push(FxHashMap::default());
                models.len() - 1
            });
            let buckets = &mut models[m].1;
            let v = *value_slots[m]
                .entry(p.value.to_string())
                .or_insert_with(|| {
                    buckets.push((p.value.clone(), Vec::new()));
                    buckets.len() - 1
                });
            buckets[v].1.push(p.predicted);
        }

        models
            .into_iter()
            .map(|(model, mut buckets)| {
                buckets.sort_by(|a, b| cx.order(&a.0, &b.0));
                let points = buckets
                    .into_iter()
                    .filter_map(|(value, mut preds)| {
                        self.aggregate.reduce(&mut preds).map(|y| (value, y))
                    })
                    .collect();
                ModelProfile { model, points }
            })
            .collect()
    }

    fn line_color(&self, cx: &CellContext<'_>, model: &str) -> Rgba {
        if cx.color_variable == Some(LABEL_COLUMN) {
            cx.color.apply(&Value::Text(model.to_string()))
        } else {
            self.color
        }
    }
}

impl LayerRenderer for AggregateLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Aggregates
    }

    fn draw(&self, cx: &CellContext<'_>, sink: &mut LayerSink<'_>) {
        for profile in self.reduce(cx) {
            let tag = cx.dataset.tag_for_model(&profile.model);
            sink.emit(
                cx,
                NodeKind::AggregateLine,
                Anchor::Path(profile.points.clone()),
                Paint::stroked(self.line_color(cx, &profile.model), self.style.size)
                    .with_opacity(self.style.alpha),
                tag,
                Some(Datum::AggregateLine {
                    model: profile.model.clone(),
                }),
            );
            for (value, predicted) in profile.points {
                sink.emit(
                    cx,
                    NodeKind::AggregatePoint,
                    Anchor::Dot {
                        x: value.clone(),
                        y: predicted,
                        radius: self.style.size,
                    },
                    Paint::filled(Rgba::BLACK)
                        .with_stroke_width(self.style.size)
                        .with_stroke_opacity(0.2)
                        .with_opacity(0.0),
                    tag,
                    Some(Datum::AggregatePoint {
                        model: profile.model.clone(),
                        value,
                        predicted,
                    }),
                );
            }
        }
    }
}
