#![forbid(unsafe_code)]

//! Observed points.

use super::{Anchor, CellContext, Datum, LayerKind, LayerRenderer, LayerSink, NodeKind};
use crate::options::LayerStyle;
use cpviz_render::{Paint, Rgba};

/// One point per (observation, model) at the observation's real value of
/// the variable and its prediction.
#[derive(Debug, Clone, Copy)]
pub struct ObservedLayer {
    style: LayerStyle,
    color: Option<Rgba>,
}

impl ObservedLayer {
    pub fn new(style: LayerStyle, color: Option<Rgba>) -> Self {
        Self { style, color }
    }
}

impl LayerRenderer for ObservedLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Observations
    }

    fn draw(&self, cx: &CellContext<'_>, sink: &mut LayerSink<'_>) {
        for key in cx.keys() {
            let Some(obs) = cx.dataset.observation(&key) else {
                continue;
            };
            let color = self.color.unwrap_or_else(|| cx.entity_color(obs));
            sink.emit(
                cx,
                NodeKind::ObservationPoint,
                Anchor::Dot {
                    x: obs.feature(cx.variable).cloned().unwrap_or_default(),
                    y: obs.predicted,
                    radius: self.style.size,
                },
                Paint::filled(color).with_opacity(self.style.alpha),
                cx.dataset.tag_for_key(&key),
                Some(Datum::Observed { key }),
            );
        }
    }
}
