#![forbid(unsafe_code)]

//! Cell axes, gridlines and titles.
//!
//! Axes are plain scene nodes under a per-cell `axes` group. They carry no
//! data anchors, so a resize simply clears the group and builds it again
//! from the rescaled scales.

use crate::scale::{LinearScale, VariableScale};
use cpviz_core::geometry::Point;
use cpviz_layout::CellGeometry;
use cpviz_render::{Node, NodeId, Paint, Rgba, Scene, Shape, TextAnchor};

pub const Y_TICK_COUNT: usize = 5;
pub const X_TICK_COUNT: usize = 3;
/// Rotation of categorical tick labels, degrees.
pub const CATEGORY_LABEL_ROTATION: f64 = -20.0;

const TICK_PADDING: f64 = 10.0;
const CATEGORY_TICK_PADDING: f64 = 2.0;
const GRID_COLOR: Rgba = Rgba::from_hex(0xd3d3d3);
const AXIS_COLOR: Rgba = Rgba::from_hex(0x333333);

/// A text node with fill-only paint.
pub(crate) fn text_node(
    class: &'static str,
    origin: Point,
    content: impl Into<String>,
    font_size: f64,
    anchor: TextAnchor,
    rotation: f64,
) -> Node {
    Node::new(
        class,
        Shape::Text {
            origin,
            content: content.into(),
            font_size,
            anchor,
            rotation,
        },
    )
    .paint(Paint::default().with_fill(AXIS_COLOR))
}

/// Integer tick label; never prints `-0`.
pub fn tick_label(v: f64) -> String {
    let r = v.round();
    if r == 0.0 { "0".to_string() } else { format!("{r}") }
}

/// Rebuild the axes of one cell under `group` (plot-area coordinates).
pub fn draw_axes(
    scene: &mut Scene,
    group: NodeId,
    x: &VariableScale,
    y: &LinearScale,
    geometry: &CellGeometry,
    font_size: f64,
) {
    scene.clear_children(group);
    let width = geometry.plot_area_width;
    let height = geometry.plot_area_height;
    let line = |from, to, color| {
        Node::new("gridline", Shape::Line { from, to }).paint(Paint::stroked(color, 1.0))
    };

    let y_axis = scene.push_group(group, "axis-y");
    for tick in y.ticks(Y_TICK_COUNT) {
        let py = y.apply(tick);
        scene.push(y_axis, line(Point::new(0.0, py), Point::new(width, py), GRID_COLOR));
        scene.push(
            y_axis,
            text_node(
                "tick-label",
                Point::new(-TICK_PADDING, py),
                tick_label(tick),
                font_size,
                TextAnchor::End,
                0.0,
            ),
        );
    }
    scene.push(
        y_axis,
        Node::new(
            "axis-line",
            Shape::Line {
                from: Point::new(0.0, 0.0),
                to: Point::new(0.0, height),
            },
        )
        .paint(Paint::stroked(AXIS_COLOR, 1.0)),
    );

    let x_axis = scene.push(group, Node::group("axis-x").translate(Point::new(0.0, height)));
    let ticks: Vec<(f64, String, TextAnchor, f64, f64)> = match x {
        VariableScale::Linear(s) => s
            .ticks(X_TICK_COUNT)
            .into_iter()
            .map(|t| (s.apply(t), tick_label(t), TextAnchor::Middle, 0.0, TICK_PADDING))
            .collect(),
        VariableScale::Point(s) => s
            .domain()
            .iter()
            .filter_map(|c| {
                Some((
                    s.apply(c)?,
                    c.clone(),
                    TextAnchor::End,
                    CATEGORY_LABEL_ROTATION,
                    CATEGORY_TICK_PADDING,
                ))
            })
            .collect(),
    };
    for (px, label, anchor, rotation, padding) in ticks {
        scene.push(x_axis, line(Point::new(px, 0.0), Point::new(px, -height), GRID_COLOR));
        scene.push(
            x_axis,
            text_node(
                "tick-label",
                Point::new(px, padding + font_size),
                label,
                font_size,
                anchor,
                rotation,
            ),
        );
    }
    scene.push(
        x_axis,
        Node::new(
            "axis-line",
            Shape::Line {
                from: Point::new(0.0, 0.0),
                to: Point::new(width, 0.0),
            },
        )
        .paint(Paint::stroked(AXIS_COLOR, 1.0)),
    );
}

/// Title shape of a cell, centered in the cell's title band.
pub fn title_shape(variable: &str, geometry: &CellGeometry, font_size: f64) -> Shape {
    Shape::Text {
        origin: Point::new(
            geometry.cell_width / 2.0,
            geometry.title_height + geometry.margin.top / 2.0,
        ),
        content: variable.to_string(),
        font_size,
        anchor: TextAnchor::Middle,
        rotation: 0.0,
    }
}
