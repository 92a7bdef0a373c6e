#![forbid(unsafe_code)]

//! SVG serialization of a [`Scene`].
//!
//! Groups become `<g>` with their class and translation; leaves become the
//! matching SVG element. Hidden nodes are emitted with `display="none"` so
//! the document keeps every node the scene has.

use crate::color::Rgba;
use crate::paint::Paint;
use crate::scene::{NodeId, Scene, Shape, TextAnchor};
use cpviz_core::geometry::Size;
use std::fmt::Write;

/// SVG exporter configuration.
#[derive(Debug, Clone)]
pub struct SvgExporter {
    /// Document size.
    pub size: Size,
    /// Font family for text nodes.
    pub font_family: String,
    /// Background fill; transparent omits the background rectangle.
    pub background: Rgba,
}

impl Default for SvgExporter {
    fn default() -> Self {
        Self {
            size: Size::new(600.0, 400.0),
            font_family: "sans-serif".to_string(),
            background: Rgba::TRANSPARENT,
        }
    }
}

impl SvgExporter {
    /// Exporter for a document of the given size.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Export the whole scene.
    pub fn export(&self, scene: &Scene) -> String {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("cpviz.render.svg", nodes = scene.len()).entered();

        let w = fmt_num(self.size.width);
        let h = fmt_num(self.size.height);
        let mut out = String::with_capacity(scene.len() * 96);
        let _ = write!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
             viewBox=\"0 0 {w} {h}\" font-family=\"{}\">",
            self.font_family
        );
        if self.background.a() > 0 {
            let _ = write!(
                out,
                "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
                self.background.to_hex()
            );
        }
        for &child in scene.children(NodeId::ROOT) {
            self.write_node(&mut out, scene, child);
        }
        out.push_str("</svg>");
        out
    }

    fn write_node(&self, out: &mut String, scene: &Scene, id: NodeId) {
        let Some(node) = scene.get(id) else { return };
        let t = node.translate;
        let transform = if t.x != 0.0 || t.y != 0.0 {
            format!(" transform=\"translate({},{})\"", fmt_num(t.x), fmt_num(t.y))
        } else {
            String::new()
        };
        let class = node.class;
        match &node.shape {
            Shape::Group => {
                let _ = write!(out, "<g class=\"{class}\"{transform}");
                write_paint(out, &node.paint, false);
                out.push('>');
                for &child in node.children() {
                    self.write_node(out, scene, child);
                }
                out.push_str("</g>");
            }
            Shape::Polyline(points) => {
                let _ = write!(out, "<polyline class=\"{class}\"{transform} points=\"");
                for (i, p) in points.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    let _ = write!(out, "{},{}", fmt_num(p.x), fmt_num(p.y));
                }
                out.push('"');
                write_paint(out, &node.paint, true);
                out.push_str("/>");
            }
            Shape::Line { from, to } => {
                let _ = write!(
                    out,
                    "<line class=\"{class}\"{transform} x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"",
                    fmt_num(from.x),
                    fmt_num(from.y),
                    fmt_num(to.x),
                    fmt_num(to.y)
                );
                write_paint(out, &node.paint, true);
                out.push_str("/>");
            }
            Shape::Circle { center, radius } => {
                let _ = write!(
                    out,
                    "<circle class=\"{class}\"{transform} cx=\"{}\" cy=\"{}\" r=\"{}\"",
                    fmt_num(center.x),
                    fmt_num(center.y),
                    fmt_num(*radius)
                );
                write_paint(out, &node.paint, true);
                out.push_str("/>");
            }
            Shape::Rect(r) => {
                let _ = write!(
                    out,
                    "<rect class=\"{class}\"{transform} x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
                    fmt_num(r.x),
                    fmt_num(r.y),
                    fmt_num(r.width),
                    fmt_num(r.height)
                );
                write_paint(out, &node.paint, true);
                out.push_str("/>");
            }
            Shape::Text {
                origin,
                content,
                font_size,
                anchor,
                rotation,
            } => {
                let anchor = match anchor {
                    TextAnchor::Start => "start",
                    TextAnchor::Middle => "middle",
                    TextAnchor::End => "end",
                };
                let transform = if *rotation != 0.0 {
                    format!(
                        " transform=\"translate({},{}) rotate({},{},{})\"",
                        fmt_num(t.x),
                        fmt_num(t.y),
                        fmt_num(*rotation),
                        fmt_num(origin.x),
                        fmt_num(origin.y)
                    )
                } else {
                    transform
                };
                let _ = write!(
                    out,
                    "<text class=\"{class}\"{transform} x=\"{}\" y=\"{}\" font-size=\"{}\" \
                     text-anchor=\"{anchor}\"",
                    fmt_num(origin.x),
                    fmt_num(origin.y),
                    fmt_num(*font_size)
                );
                write_paint(out, &node.paint, false);
                out.push('>');
                svg_escape_into(out, content);
                out.push_str("</text>");
            }
        }
    }
}

/// Write presentation attributes. `shape` selects the unfilled default.
fn write_paint(out: &mut String, paint: &Paint, shape: bool) {
    if !paint.visible {
        out.push_str(" display=\"none\"");
    }
    if let Some(stroke) = paint.stroke {
        let _ = write!(
            out,
            " stroke=\"{}\" stroke-width=\"{}\"",
            stroke.to_hex(),
            fmt_num(paint.stroke_width)
        );
        if paint.stroke_opacity < 1.0 {
            let _ = write!(out, " stroke-opacity=\"{}\"", fmt_num(paint.stroke_opacity));
        }
    }
    match paint.fill {
        Some(fill) => {
            let _ = write!(out, " fill=\"{}\"", fill.to_hex());
        }
        None if shape => out.push_str(" fill=\"none\""),
        None => {}
    }
    if paint.opacity < 1.0 {
        let _ = write!(out, " opacity=\"{}\"", fmt_num(paint.opacity));
    }
}

/// Format a coordinate with at most three decimals and no trailing zeros.
fn fmt_num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn svg_escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Node;
    use cpviz_core::geometry::Point;

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        let g = scene.push(
            NodeId::ROOT,
            Node::group("cell").translate(Point::new(40.0, 10.0)),
        );
        scene.push(
            g,
            Node::new(
                "iceplotline",
                Shape::Polyline(vec![Point::new(0.0, 1.5), Point::new(10.0, 2.0)]),
            )
            .paint(Paint::stroked(Rgba::from_hex(0x191970), 2.5).with_opacity(0.4)),
        );
        scene.push(
            g,
            Node::new(
                "title",
                Shape::Text {
                    origin: Point::new(0.0, 0.0),
                    content: "a < b & c".to_string(),
                    font_size: 14.0,
                    anchor: TextAnchor::Middle,
                    rotation: 0.0,
                },
            ),
        );
        scene
    }

    #[test]
    fn svg_basic_structure() {
        let svg = SvgExporter::default().export(&sample_scene());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("xmlns"));
        assert!(svg.contains("<g class=\"cell\" transform=\"translate(40,10)\">"));
    }

    #[test]
    fn polyline_attributes() {
        let svg = SvgExporter::default().export(&sample_scene());
        assert!(svg.contains("points=\"0,1.5 10,2\""));
        assert!(svg.contains("stroke=\"#191970\" stroke-width=\"2.5\""));
        assert!(svg.contains("fill=\"none\""));
        assert!(svg.contains("opacity=\"0.4\""));
    }

    #[test]
    fn text_is_escaped() {
        let svg = SvgExporter::default().export(&sample_scene());
        assert!(svg.contains(">a &lt; b &amp; c</text>"));
        assert!(svg.contains("text-anchor=\"middle\""));
    }

    #[test]
    fn hidden_nodes_marked() {
        let mut scene = sample_scene();
        let g = scene.children(NodeId::ROOT)[0];
        scene.set_visible(g, false);
        let svg = SvgExporter::default().export(&scene);
        assert!(svg.contains("display=\"none\""));
    }

    #[test]
    fn background_rect() {
        let exporter = SvgExporter {
            background: Rgba::WHITE,
            ..SvgExporter::default()
        };
        let svg = exporter.export(&Scene::new());
        assert!(svg.contains("<rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>"));
    }

    #[test]
    fn number_formatting() {
        assert_eq!(fmt_num(3.0), "3");
        assert_eq!(fmt_num(-0.0001), "0");
        assert_eq!(fmt_num(1.23456), "1.235");
        assert_eq!(fmt_num(f64::NAN), "0");
    }
}
