#![forbid(unsafe_code)]

//! Rug marks on both axes.

use super::{Anchor, CellContext, LayerKind, LayerRenderer, LayerSink, NodeKind};
use crate::options::LayerStyle;
use cpviz_render::{Paint, Rgba};

/// Two marks per (observation, model): one rising from the bottom edge at
/// the observed value, one from the left edge at the prediction. Their
/// length comes from the geometry's rug band.
#[derive(Debug, Clone, Copy)]
pub struct RugLayer {
    style: LayerStyle,
    color: Option<Rgba>,
}

impl RugLayer {
    pub fn new(style: LayerStyle, color: Option<Rgba>) -> Self {
        Self { style, color }
    }
}

impl LayerRenderer for RugLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Rugs
    }

    fn draw(&self, cx: &CellContext<'_>, sink: &mut LayerSink<'_>) {
        for key in cx.keys() {
            let Some(obs) = cx.dataset.observation(&key) else {
                continue;
            };
            let color = self.color.unwrap_or_else(|| cx.entity_color(obs));
            let paint = Paint::stroked(color, 1.0).with_opacity(self.style.alpha);
            let tag = cx.dataset.tag_for_key(&key);
            let value = obs.feature(cx.variable).cloned().unwrap_or_default();
            sink.emit(cx, NodeKind::RugX, Anchor::RugX(value), paint, tag, None);
            sink.emit(cx, NodeKind::RugY, Anchor::RugY(obs.predicted), paint, tag, None);
        }
    }
}
