#![forbid(unsafe_code)]

//! Color legend.

use crate::axes::text_node;
use crate::data::Value;
use crate::scale::ColorScale;
use cpviz_core::geometry::{Point, Rect};
use cpviz_layout::ChartFrame;
use cpviz_render::{Node, NodeId, Paint, Rgba, Scene, Shape, TextAnchor};

/// Side of a legend swatch.
pub const SWATCH_SIZE: f64 = 10.0;
/// Vertical distance between legend keys.
pub const KEY_SPACING: f64 = 20.0;

/// One legend key.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgba,
}

/// Title and keys of the color encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub title: String,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    /// Keys for every domain entry of `scale`. Each swatch color is looked
    /// up by the label itself.
    pub fn from_scale(color_variable: &str, scale: &dyn ColorScale) -> Self {
        let entries = scale
            .domain()
            .into_iter()
            .map(|label| LegendEntry {
                color: scale.apply(&Value::Text(label.clone())),
                label,
            })
            .collect();
        Self {
            title: format!("{color_variable}:"),
            entries,
        }
    }

    /// Rebuild the legend under `group` for `frame`.
    pub fn draw(&self, scene: &mut Scene, group: NodeId, frame: &ChartFrame, font_size: f64) {
        scene.clear_children(group);
        let rect = frame.legend_rect();
        scene.set_translate(group, Point::new(rect.x, rect.y));
        let height = frame.chart.height;
        scene.push(
            group,
            text_node(
                "legend-title",
                Point::new(SWATCH_SIZE, height * 0.1),
                self.title.clone(),
                font_size,
                TextAnchor::Start,
                0.0,
            ),
        );
        for (i, entry) in self.entries.iter().enumerate() {
            let y = height * 0.2 + KEY_SPACING * i as f64;
            let key = scene.push_group(group, "legend-key");
            scene.push(
                key,
                Node::new(
                    "legend-swatch",
                    Shape::Rect(Rect::new(SWATCH_SIZE, y - SWATCH_SIZE, SWATCH_SIZE, SWATCH_SIZE)),
                )
                .paint(Paint::filled(entry.color)),
            );
            scene.push(
                key,
                text_node(
                    "legend-label",
                    Point::new(SWATCH_SIZE * 2.5, y),
                    entry.label.clone(),
                    font_size,
                    TextAnchor::Start,
                    0.0,
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::{OrdinalColor, QuantizedColor};
    use cpviz_core::geometry::Size;
    use cpviz_style::or_rd;

    #[test]
    fn quantized_legend_round_trips() {
        let scale = QuantizedColor::new(1.0, 9.0, 3, Rgba::BLACK);
        let legend = Legend::from_scale("age", &scale);
        assert_eq!(legend.title, "age:");
        let labels: Vec<&str> = legend.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["[1; 3.8)", "[3.8; 6.6)", "[6.6; 9]"]);
        let palette = or_rd(3);
        for (entry, expected) in legend.entries.iter().zip(palette) {
            assert_eq!(entry.color, expected);
        }
        assert_eq!(
            legend.entries[2].color,
            scale.apply(&Value::from(9.0))
        );
    }

    #[test]
    fn keys_stack_below_title() {
        let values = [Value::from("a"), Value::from("b")];
        let scale = OrdinalColor::new(&values, Rgba::BLACK);
        let legend = Legend::from_scale("group", &scale);
        let frame = ChartFrame::compute(Size::new(500.0, 400.0), false, true);
        let mut scene = Scene::new();
        let group = scene.push_group(NodeId::ROOT, "legend");
        legend.draw(&mut scene, group, &frame, 12.0);
        assert_eq!(scene.get(group).unwrap().translate, Point::new(400.0, 0.0));
        let swatches = scene.find_class(group, "legend-swatch");
        assert_eq!(swatches.len(), 2);
        let ys: Vec<f64> = swatches
            .iter()
            .filter_map(|id| match scene.get(*id)?.shape {
                Shape::Rect(r) => Some(r.y),
                _ => None,
            })
            .collect();
        assert_eq!(ys[1] - ys[0], KEY_SPACING);
        assert_eq!(ys[0], 400.0 * 0.2 - SWATCH_SIZE);
    }
}
