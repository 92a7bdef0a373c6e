#![forbid(unsafe_code)]

//! Residual segments.

use super::{Anchor, CellContext, Datum, LayerKind, LayerRenderer, LayerSink, NodeKind};
use crate::options::LayerStyle;
use cpviz_render::{Paint, Rgba};

/// Stroke width of a residual segment.
pub const RESIDUAL_LINE_WIDTH: f64 = 2.0;

/// For each (observation, model) with a known outcome: a vertical segment
/// from the prediction to the actual outcome at the observed value, and a
/// point at the actual outcome.
#[derive(Debug, Clone, Copy)]
pub struct ResidualLayer {
    style: LayerStyle,
    color: Option<Rgba>,
}

impl ResidualLayer {
    pub fn new(style: LayerStyle, color: Option<Rgba>) -> Self {
        Self { style, color }
    }
}

impl LayerRenderer for ResidualLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Residuals
    }

    fn draw(&self, cx: &CellContext<'_>, sink: &mut LayerSink<'_>) {
        for key in cx.keys() {
            let Some(obs) = cx.dataset.observation(&key) else {
                continue;
            };
            let Some(actual) = obs.actual else {
                continue;
            };
            let color = self.color.unwrap_or_else(|| cx.entity_color(obs));
            let tag = cx.dataset.tag_for_key(&key);
            let value = obs.feature(cx.variable).cloned().unwrap_or_default();
            sink.emit(
                cx,
                NodeKind::ResidualLine,
                Anchor::Stem {
                    x: value.clone(),
                    from: obs.predicted,
                    to: actual,
                },
                Paint::stroked(color, RESIDUAL_LINE_WIDTH).with_opacity(self.style.alpha),
                tag,
                Some(Datum::Residual { key: key.clone() }),
            );
            sink.emit(
                cx,
                NodeKind::ResidualPoint,
                Anchor::Dot {
                    x: value,
                    y: actual,
                    radius: self.style.size,
                },
                Paint::filled(color).with_opacity(self.style.alpha),
                tag,
                Some(Datum::Residual { key }),
            );
        }
    }
}
