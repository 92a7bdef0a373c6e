#![forbid(unsafe_code)]

//! Individual conditional expectation lines.

use super::{Anchor, CellContext, Datum, LayerKind, LayerRenderer, LayerSink, NodeKind};
use crate::options::LayerStyle;
use cpviz_render::{Paint, Rgba};

/// One line per (observation, model) through its sampled grid, plus a hit
/// circle per sample that stays transparent until highlighted.
#[derive(Debug, Clone, Copy)]
pub struct ProfileLayer {
    style: LayerStyle,
}

impl ProfileLayer {
    pub fn new(style: LayerStyle) -> Self {
        Self { style }
    }

    /// Base paint of a profile line.
    pub fn line_paint(&self, color: Rgba) -> Paint {
        Paint::stroked(color, self.style.size).with_opacity(self.style.alpha)
    }

    /// Base paint of a sample circle: present for hit testing, not drawn.
    pub fn point_paint(&self) -> Paint {
        Paint::filled(Rgba::BLACK)
            .with_stroke_width(self.style.size)
            .with_stroke_opacity(0.2)
            .with_opacity(0.0)
    }
}

impl LayerRenderer for ProfileLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Profiles
    }

    fn draw(&self, cx: &CellContext<'_>, sink: &mut LayerSink<'_>) {
        for (key, mut points) in cx.groups() {
            let Some(obs) = cx.dataset.observation(&key) else {
                continue;
            };
            points.retain(|p| !p.value.is_empty());
            points.sort_by(|a, b| cx.order(&a.value, &b.value));
            let tag = cx.dataset.tag_for_key(&key);
            let path = points
                .iter()
                .map(|p| (p.value.clone(), p.predicted))
                .collect();
            sink.emit(
                cx,
                NodeKind::ProfileLine,
                Anchor::Path(path),
                self.line_paint(cx.profile_color(obs)),
                tag,
                Some(Datum::ProfileLine { key: key.clone() }),
            );
            for p in points {
                sink.emit(
                    cx,
                    NodeKind::ProfilePoint,
                    Anchor::Dot {
                        x: p.value.clone(),
                        y: p.predicted,
                        radius: self.style.size,
                    },
                    self.point_paint(),
                    tag,
                    Some(Datum::ProfilePoint {
                        key: key.clone(),
                        value: p.value.clone(),
                        predicted: p.predicted,
                    }),
                );
            }
        }
    }
}
