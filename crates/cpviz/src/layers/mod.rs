#![forbid(unsafe_code)]

//! Layer compositor.
//!
//! Five renderers draw into per-cell sub-groups of the scene:
//!
//! | Layer | Node kinds | Keyed by |
//! |---|---|---|
//! | [`ProfileLayer`] | profile line, hidden hit circles | observation |
//! | [`AggregateLayer`] | aggregate line, hidden hit circles | model |
//! | [`RugLayer`] | horizontal and vertical rug marks | observation |
//! | [`ResidualLayer`] | residual segment, actual-outcome point | observation |
//! | [`ObservedLayer`] | observed point | observation |
//!
//! Every drawn node is recorded in the [`NodeRegistry`] with its data-space
//! [`Anchor`], so a resize re-places nodes from the rescaled scales without
//! drawing anything new.

pub mod aggregate;
pub mod observed;
pub mod profile;
pub mod residual;
pub mod rug;

pub use aggregate::AggregateLayer;
pub use observed::ObservedLayer;
pub use profile::ProfileLayer;
pub use residual::ResidualLayer;
pub use rug::RugLayer;

use crate::data::{Dataset, JoinKey, Observation, ProfilePoint, Value};
use crate::options::ResolvedOptions;
use crate::scale::{ColorScale, LinearScale, ScaleManager, VariableScale};
use cpviz_core::geometry::Point;
use cpviz_layout::CellGeometry;
use cpviz_render::{EntityTag, Node, NodeId, Paint, Rgba, Scene, Shape};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::cmp::Ordering;

bitflags::bitflags! {
    /// Enabled layers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LayerSet: u8 {
        const PROFILES     = 0b0000_0001;
        const OBSERVATIONS = 0b0000_0010;
        const RUGS         = 0b0000_0100;
        const RESIDUALS    = 0b0000_1000;
        const AGGREGATES   = 0b0001_0000;

        /// Every individual layer, no aggregates.
        const DEFAULT = Self::PROFILES.bits()
            | Self::OBSERVATIONS.bits()
            | Self::RUGS.bits()
            | Self::RESIDUALS.bits();
    }
}

impl Default for LayerSet {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One of the five layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Profiles,
    Observations,
    Rugs,
    Residuals,
    Aggregates,
}

impl LayerKind {
    /// Paint order inside a cell, bottom to top.
    pub const DRAW_ORDER: [Self; 5] = [
        Self::Profiles,
        Self::Aggregates,
        Self::Rugs,
        Self::Residuals,
        Self::Observations,
    ];

    pub const fn flag(self) -> LayerSet {
        match self {
            Self::Profiles => LayerSet::PROFILES,
            Self::Observations => LayerSet::OBSERVATIONS,
            Self::Rugs => LayerSet::RUGS,
            Self::Residuals => LayerSet::RESIDUALS,
            Self::Aggregates => LayerSet::AGGREGATES,
        }
    }

    /// Class of the layer's sub-group.
    pub const fn group_class(self) -> &'static str {
        match self {
            Self::Profiles => "profiles",
            Self::Observations => "observations",
            Self::Rugs => "rugs",
            Self::Residuals => "residuals",
            Self::Aggregates => "aggregates",
        }
    }
}

/// What a drawn node depicts. Doubles as its scene class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    ProfileLine,
    ProfilePoint,
    ObservationPoint,
    RugX,
    RugY,
    ResidualLine,
    ResidualPoint,
    AggregateLine,
    AggregatePoint,
}

impl NodeKind {
    pub const ALL: [Self; 9] = [
        Self::ProfileLine,
        Self::ProfilePoint,
        Self::ObservationPoint,
        Self::RugX,
        Self::RugY,
        Self::ResidualLine,
        Self::ResidualPoint,
        Self::AggregateLine,
        Self::AggregatePoint,
    ];

    pub const fn class(self) -> &'static str {
        match self {
            Self::ProfileLine => "profile-line",
            Self::ProfilePoint => "profile-point",
            Self::ObservationPoint => "observation-point",
            Self::RugX => "rug-x",
            Self::RugY => "rug-y",
            Self::ResidualLine => "residual-line",
            Self::ResidualPoint => "residual-point",
            Self::AggregateLine => "aggregate-line",
            Self::AggregatePoint => "aggregate-point",
        }
    }

    pub fn from_class(class: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.class() == class)
    }

    pub const fn layer(self) -> LayerKind {
        match self {
            Self::ProfileLine | Self::ProfilePoint => LayerKind::Profiles,
            Self::ObservationPoint => LayerKind::Observations,
            Self::RugX | Self::RugY => LayerKind::Rugs,
            Self::ResidualLine | Self::ResidualPoint => LayerKind::Residuals,
            Self::AggregateLine | Self::AggregatePoint => LayerKind::Aggregates,
        }
    }
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

/// Data-space position of a node, re-evaluated against the scales on every
/// resize.
#[derive(Debug, Clone, PartialEq)]
pub enum Anchor {
    /// Polyline through `(x value, outcome)` pairs.
    Path(Vec<(Value, f64)>),
    Dot { x: Value, y: f64, radius: f64 },
    /// Vertical segment at `x` between two outcomes.
    Stem { x: Value, from: f64, to: f64 },
    /// Mark rising from the bottom edge at an x value.
    RugX(Value),
    /// Mark extending from the left edge at an outcome.
    RugY(f64),
}

/// Pixel shape of `anchor` in plot-area coordinates.
///
/// `None` when an x value has no position on `x` (a category outside the
/// configured order, or a value of the wrong kind).
pub fn place(
    anchor: &Anchor,
    x: &VariableScale,
    y: &LinearScale,
    geometry: &CellGeometry,
) -> Option<Shape> {
    match anchor {
        Anchor::Path(points) => {
            let pixels: Vec<Point> = points
                .iter()
                .filter_map(|(v, outcome)| Some(Point::new(x.apply(v)?, y.apply(*outcome))))
                .collect();
            (!pixels.is_empty()).then_some(Shape::Polyline(pixels))
        }
        Anchor::Dot { x: v, y: outcome, radius } => Some(Shape::Circle {
            center: Point::new(x.apply(v)?, y.apply(*outcome)),
            radius: *radius,
        }),
        Anchor::Stem { x: v, from, to } => {
            let px = x.apply(v)?;
            Some(Shape::Line {
                from: Point::new(px, y.apply(*from)),
                to: Point::new(px, y.apply(*to)),
            })
        }
        Anchor::RugX(v) => {
            let px = x.apply(v)?;
            let bottom = geometry.plot_area_height;
            Some(Shape::Line {
                from: Point::new(px, bottom),
                to: Point::new(px, bottom - geometry.rug_length),
            })
        }
        Anchor::RugY(outcome) => {
            let py = y.apply(*outcome);
            Some(Shape::Line {
                from: Point::new(0.0, py),
                to: Point::new(geometry.rug_length, py),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// What a hit on a node refers to; the source of tooltip content.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    ProfileLine { key: JoinKey },
    ProfilePoint { key: JoinKey, value: Value, predicted: f64 },
    Observed { key: JoinKey },
    Residual { key: JoinKey },
    AggregateLine { model: String },
    AggregatePoint { model: String, value: Value, predicted: f64 },
}

/// A drawn node and how to place it again.
#[derive(Debug, Clone)]
pub struct PlacedNode {
    pub node: NodeId,
    pub kind: NodeKind,
    /// Index of the cell's variable.
    pub variable: usize,
    pub anchor: Anchor,
    pub datum: Option<Datum>,
}

/// Every node drawn by a layer, in draw order.
///
/// A node's `data` field holds its registry slot plus one; zero means the
/// node is not layer-drawn.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    placed: Vec<PlacedNode>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    pub fn placed(&self) -> &[PlacedNode] {
        &self.placed
    }

    /// Entry for a node's `data` field.
    pub fn lookup(&self, data: u64) -> Option<&PlacedNode> {
        let slot = usize::try_from(data.checked_sub(1)?).ok()?;
        self.placed.get(slot)
    }

    /// Placed nodes of one kind.
    pub fn of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &PlacedNode> + '_ {
        self.placed.iter().filter(move |p| p.kind == kind)
    }

    fn record(&mut self, placed: PlacedNode) -> u64 {
        self.placed.push(placed);
        self.placed.len() as u64
    }

    /// Re-place every node from the current scale ranges and geometry.
    /// Nodes whose anchor no longer resolves keep their last shape.
    pub fn update_positions(
        &self,
        scene: &mut Scene,
        scales: &ScaleManager,
        variables: &[String],
        geometry: &CellGeometry,
    ) {
        for placed in &self.placed {
            let Some(x) = variables
                .get(placed.variable)
                .and_then(|name| scales.variable(name))
            else {
                continue;
            };
            if let Some(shape) = place(&placed.anchor, x, scales.outcome(), geometry) {
                scene.set_shape(placed.node, shape);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Cell context and sink
// ---------------------------------------------------------------------------

/// Everything a layer reads while drawing one cell.
pub struct CellContext<'a> {
    pub dataset: &'a Dataset,
    pub options: &'a ResolvedOptions,
    pub color: &'a dyn ColorScale,
    /// Observation column driving the color scale, if any.
    pub color_variable: Option<&'a str>,
    /// Literal color for profile lines (a `color` option that is not a
    /// column).
    pub line_color: Option<Rgba>,
    pub variable: &'a str,
    pub variable_index: usize,
    /// Profile points of `variable`, in input order.
    pub points: Vec<&'a ProfilePoint>,
    pub x: &'a VariableScale,
    pub y: &'a LinearScale,
    pub geometry: &'a CellGeometry,
}

impl CellContext<'_> {
    /// Profile points grouped by join key, groups in first-seen order.
    pub fn groups(&self) -> Vec<(JoinKey, Vec<&ProfilePoint>)> {
        group_by_key(&self.points)
    }

    /// Join keys present in this cell, first-seen order.
    pub fn keys(&self) -> Vec<JoinKey> {
        let mut seen = FxHashSet::default();
        let mut keys = Vec::new();
        for p in &self.points {
            let key = p.join_key();
            if seen.insert(key.clone()) {
                keys.push(key);
            }
        }
        keys
    }

    /// Color-scale color of an observation.
    pub fn entity_color(&self, obs: &Observation) -> Rgba {
        match self.color_variable {
            Some(name) => self.color.apply(&obs.field(name).unwrap_or_default()),
            None => self.options.default_color,
        }
    }

    /// Color of an observation's profile line.
    pub fn profile_color(&self, obs: &Observation) -> Rgba {
        self.line_color.unwrap_or_else(|| self.entity_color(obs))
    }

    /// Sort key along the x axis; unplaceable values sort last.
    pub fn order(&self, a: &Value, b: &Value) -> Ordering {
        let ka = self.x.order_key(a).unwrap_or(f64::INFINITY);
        let kb = self.x.order_key(b).unwrap_or(f64::INFINITY);
        ka.total_cmp(&kb)
    }
}

pub(crate) fn group_by_key<'a>(
    points: &[&'a ProfilePoint],
) -> Vec<(JoinKey, Vec<&'a ProfilePoint>)> {
    let mut slots: FxHashMap<JoinKey, usize> = FxHashMap::default();
    let mut groups: Vec<(JoinKey, Vec<&ProfilePoint>)> = Vec::new();
    for &p in points {
        let key = p.join_key();
        match slots.get(&key) {
            Some(&i) => groups[i].1.push(p),
            None => {
                slots.insert(key.clone(), groups.len());
                groups.push((key, vec![p]));
            }
        }
    }
    groups
}

/// Where a layer puts its nodes.
pub struct LayerSink<'a> {
    scene: &'a mut Scene,
    registry: &'a mut NodeRegistry,
    group: NodeId,
    skipped: usize,
}

impl<'a> LayerSink<'a> {
    pub fn new(scene: &'a mut Scene, registry: &'a mut NodeRegistry, group: NodeId) -> Self {
        Self {
            scene,
            registry,
            group,
            skipped: 0,
        }
    }

    /// Place and record one node. Returns `None` (and counts a skip) when
    /// the anchor has no position on the cell's scales.
    pub fn emit(
        &mut self,
        cx: &CellContext<'_>,
        kind: NodeKind,
        anchor: Anchor,
        paint: Paint,
        tag: Option<EntityTag>,
        datum: Option<Datum>,
    ) -> Option<NodeId> {
        let Some(shape) = place(&anchor, cx.x, cx.y, cx.geometry) else {
            self.skipped += 1;
            return None;
        };
        let mut node = Node::new(kind.class(), shape).paint(paint);
        if let Some(tag) = tag {
            node = node.tag(tag);
        }
        let id = self.scene.push(self.group, node);
        let data = self.registry.record(PlacedNode {
            node: id,
            kind,
            variable: cx.variable_index,
            anchor,
            datum,
        });
        if let Some(n) = self.scene.get_mut(id) {
            n.data = data;
        }
        Some(id)
    }

    /// Anchors that could not be placed so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// A layer renderer.
pub trait LayerRenderer {
    fn kind(&self) -> LayerKind;

    /// Draw this layer's nodes for one cell.
    fn draw(&self, cx: &CellContext<'_>, sink: &mut LayerSink<'_>);
}

/// Sub-group of each drawn layer in one cell.
pub type LayerGroups = SmallVec<[(LayerKind, NodeId); 5]>;

/// The configured set of renderers.
pub struct LayerCompositor {
    layers: Vec<Box<dyn LayerRenderer>>,
    enabled: LayerSet,
}

impl LayerCompositor {
    /// Renderers for `options`. The four individual layers always draw; the
    /// toggles only decide visibility. The aggregate layer exists only when
    /// a reduction is configured.
    pub fn new(options: &ResolvedOptions) -> Self {
        let mut layers: Vec<Box<dyn LayerRenderer>> = Vec::with_capacity(5);
        for kind in LayerKind::DRAW_ORDER {
            match kind {
                LayerKind::Profiles => layers.push(Box::new(ProfileLayer::new(options.ices))),
                LayerKind::Aggregates => {
                    if let Some(aggregate) = options.aggregate {
                        layers.push(Box::new(AggregateLayer::new(
                            aggregate,
                            options.pdps,
                            options.color_pdps,
                        )));
                    }
                }
                LayerKind::Rugs => {
                    layers.push(Box::new(RugLayer::new(options.rugs, options.color_rugs)));
                }
                LayerKind::Residuals => layers.push(Box::new(ResidualLayer::new(
                    options.residuals,
                    options.color_residuals,
                ))),
                LayerKind::Observations => layers.push(Box::new(ObservedLayer::new(
                    options.points,
                    options.color_points,
                ))),
            }
        }
        Self {
            layers,
            enabled: options.layers,
        }
    }

    pub fn kinds(&self) -> impl Iterator<Item = LayerKind> + '_ {
        self.layers.iter().map(|l| l.kind())
    }

    /// Draw every layer of one cell under `parent`, one sub-group each.
    pub fn draw_cell(
        &self,
        cx: &CellContext<'_>,
        scene: &mut Scene,
        registry: &mut NodeRegistry,
        parent: NodeId,
    ) -> LayerGroups {
        let _span = tracing::debug_span!("cpviz.layers.draw", variable = cx.variable).entered();
        let mut groups = LayerGroups::new();
        for layer in &self.layers {
            let kind = layer.kind();
            let group = scene.push_group(parent, kind.group_class());
            if !self.enabled.contains(kind.flag()) {
                scene.set_visible(group, false);
            }
            let mut sink = LayerSink::new(scene, registry, group);
            layer.draw(cx, &mut sink);
            if sink.skipped() > 0 {
                tracing::warn!(
                    variable = cx.variable,
                    layer = kind.group_class(),
                    skipped = sink.skipped(),
                    "values without a position on the x axis were not drawn"
                );
            }
            groups.push((kind, group));
        }
        groups
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::options::PlotOptions;

    #[test]
    fn default_layer_set_excludes_aggregates() {
        assert!(LayerSet::default().contains(LayerSet::RUGS));
        assert!(!LayerSet::DEFAULT.contains(LayerSet::AGGREGATES));
    }

    #[test]
    fn node_kind_class_round_trip() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_class(kind.class()), Some(kind));
        }
        assert_eq!(NodeKind::from_class("axis-line"), None);
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let (profiles, _) = two_observations();
        let refs: Vec<&ProfilePoint> = profiles.iter().collect();
        let groups = group_by_key(&refs);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, JoinKey::new("1", "lm"));
        assert_eq!(groups[0].1.len(), 3);
    }

    #[test]
    fn rug_marks_hug_the_plot_edges() {
        let (profiles, observations) = two_observations();
        let fx = Fixture::new(profiles, observations, "x", PlotOptions::with_variables(["x"]));
        let x = fx.scales.variable("x").unwrap();
        let g = &fx.geometry;
        let Some(Shape::Line { from, to }) =
            place(&Anchor::RugX(Value::from(1.0)), x, fx.scales.outcome(), g)
        else {
            panic!("expected a line");
        };
        assert_eq!(from.y, g.plot_area_height);
        assert_eq!(from.y - to.y, g.rug_length);
        let Some(Shape::Line { from, to }) =
            place(&Anchor::RugY(2.0), x, fx.scales.outcome(), g)
        else {
            panic!("expected a line");
        };
        assert_eq!((from.x, to.x), (0.0, g.rug_length));
    }

    #[test]
    fn unknown_category_is_not_placed() {
        let profiles = vec![ProfilePoint::new("1", "lm", "g", "a", 1.0)];
        let observations = vec![Observation::new("1", "lm", 1.0, None).with_feature("g", "a")];
        let fx = Fixture::new(profiles, observations, "g", PlotOptions::with_variables(["g"]));
        let x = fx.scales.variable("g").unwrap();
        let anchor = Anchor::Dot {
            x: Value::from("zzz"),
            y: 1.0,
            radius: 2.0,
        };
        assert_eq!(place(&anchor, x, fx.scales.outcome(), &fx.geometry), None);
    }

    #[test]
    fn registry_lookup_uses_node_data() {
        let (profiles, observations) = two_observations();
        let fx = Fixture::new(profiles, observations, "x", PlotOptions::with_variables(["x"]));
        let (scene, registry, _) = fx.draw(&ObservedLayer::new(fx.options.points, None));
        assert_eq!(registry.len(), 2);
        for placed in registry.placed() {
            let node = scene.get(placed.node).unwrap();
            let back = registry.lookup(node.data).unwrap();
            assert_eq!(back.node, placed.node);
        }
        assert!(registry.lookup(0).is_none());
    }

    #[test]
    fn compositor_draws_every_individual_layer_even_when_hidden() {
        let (profiles, observations) = two_observations();
        let mut options = PlotOptions::with_variables(["x"]);
        options.show_rugs = Some(false);
        let fx = Fixture::new(profiles, observations, "x", options);
        let compositor = LayerCompositor::new(&fx.options);
        assert_eq!(
            compositor.kinds().collect::<Vec<_>>(),
            vec![
                LayerKind::Profiles,
                LayerKind::Rugs,
                LayerKind::Residuals,
                LayerKind::Observations
            ]
        );
        let mut scene = Scene::new();
        let mut registry = NodeRegistry::new();
        let groups = compositor.draw_cell(&fx.context(), &mut scene, &mut registry, NodeId::ROOT);
        let rugs = groups
            .iter()
            .find(|(k, _)| *k == LayerKind::Rugs)
            .map(|(_, g)| *g)
            .unwrap();
        assert!(!scene.is_rendered(rugs));
        assert_eq!(registry.of_kind(NodeKind::RugX).count(), 2);
    }
}
