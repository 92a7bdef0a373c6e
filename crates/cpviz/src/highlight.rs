#![forbid(unsafe_code)]

//! Linked highlighting across layers and the companion table.
//!
//! # State machine
//!
//! ```text
//!            enter(target, source)
//!   Idle ───────────────────────────▶ Highlighted { target, source }
//!    ▲                                   │   ▲
//!    │              leave()              │   │ enter(other target)
//!    └───────────────────────────────────┘   └── retarget, no stacking
//! ```
//!
//! Every transition starts from the base paints: entering resets the whole
//! scene, then restyles the target's nodes. The final style therefore
//! depends only on the last logical event, never on the order in which
//! visual transitions finish.
//!
//! # Emphasis policy
//!
//! | Source | Target's nodes | Other entities' profile lines | Other points, rugs, residuals |
//! |---|---|---|---|
//! | layer hover | active | unchanged | unchanged |
//! | table row | active | hidden | opacity × [`DIM_FACTOR`] |

use crate::data::{Dataset, JoinKey};
use crate::layers::{LayerKind, NodeKind, NodeRegistry};
use cpviz_render::{Paint, Scene};
use rustc_hash::FxHashSet;
use std::fmt;
use std::time::Duration;

/// Duration of hover transitions started by layer hover.
pub const HOVER_TRANSITION: Duration = Duration::from_millis(300);

/// Opacity multiplier for competing entities during a table-row hover.
pub const DIM_FACTOR: f64 = 0.2;

/// Something that can be highlighted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HighlightTarget {
    /// One (observation, model) pair across every layer.
    Entity(JoinKey),
    /// The aggregate profile of one model.
    Model(String),
}

impl fmt::Display for HighlightTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity(key) => write!(f, "{key}"),
            Self::Model(model) => write!(f, "model {model}"),
        }
    }
}

/// Where a hover originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverSource {
    Layer(LayerKind),
    TableRow,
}

/// Current highlight.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HighlightState {
    #[default]
    Idle,
    Highlighted {
        target: HighlightTarget,
        source: HoverSource,
    },
}

impl HighlightState {
    pub fn target(&self) -> Option<&HighlightTarget> {
        match self {
            Self::Idle => None,
            Self::Highlighted { target, .. } => Some(target),
        }
    }
}

/// Active paint of a node of `kind` whose base paint is `base`.
pub fn active_paint(kind: NodeKind, base: Paint) -> Paint {
    match kind {
        NodeKind::ProfileLine
        | NodeKind::ProfilePoint
        | NodeKind::AggregateLine
        | NodeKind::AggregatePoint => base
            .with_stroke_width(base.stroke_width + 2.0)
            .with_opacity(1.0),
        NodeKind::ObservationPoint | NodeKind::ResidualLine | NodeKind::ResidualPoint => {
            base.with_stroke_width(4.0)
        }
        NodeKind::RugX | NodeKind::RugY => base
            .with_stroke_width(base.stroke_width + 1.0)
            .with_opacity(1.0),
    }
}

/// Paint of a competing entity's node during a table-row hover.
pub fn competing_paint(kind: NodeKind, base: Paint) -> Paint {
    match kind {
        NodeKind::ProfileLine | NodeKind::ProfilePoint => base.hidden(),
        NodeKind::AggregateLine | NodeKind::AggregatePoint => base,
        _ => base.with_opacity(base.opacity * DIM_FACTOR),
    }
}

/// Whether `paint` is emphasized relative to `base`.
pub fn is_emphasized(paint: &Paint, base: &Paint) -> bool {
    paint.visible && (paint.stroke_width > base.stroke_width || paint.opacity > base.opacity)
}

/// Owns the highlight state of one plot.
#[derive(Debug, Default)]
pub struct HighlightCoordinator {
    state: HighlightState,
}

impl HighlightCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &HighlightState {
        &self.state
    }

    fn source(&self) -> Option<HoverSource> {
        match self.state {
            HighlightState::Idle => None,
            HighlightState::Highlighted { source, .. } => Some(source),
        }
    }

    /// Highlight `target`. Returns whether anything changed; repeating the
    /// current highlight is a no-op and an unknown target is ignored.
    pub fn enter(
        &mut self,
        target: HighlightTarget,
        source: HoverSource,
        scene: &mut Scene,
        registry: &NodeRegistry,
        dataset: &Dataset,
    ) -> bool {
        if self.state.target() == Some(&target) && self.source() == Some(source) {
            return false;
        }
        let Some(tag) = dataset.tag(&target) else {
            tracing::debug!(target = %target, "highlight target has no drawn nodes");
            return false;
        };

        let transition = transition_for(source);
        scene.reset_all_styles(transition);
        let dim_others =
            source == HoverSource::TableRow && matches!(target, HighlightTarget::Entity(_));
        for placed in registry.placed() {
            let Some(node) = scene.get(placed.node) else {
                continue;
            };
            let base = node.base;
            if node.tag == Some(tag) {
                scene.restyle(placed.node, active_paint(placed.kind, base), transition);
            } else if dim_others {
                scene.restyle(placed.node, competing_paint(placed.kind, base), None);
            }
        }

        tracing::debug!(target = %target, source = ?source, "highlight");
        self.state = HighlightState::Highlighted { target, source };
        true
    }

    /// Return to idle, restoring every base paint. Returns whether anything
    /// changed.
    pub fn leave(&mut self, scene: &mut Scene) -> bool {
        let HighlightState::Highlighted { source, .. } = &self.state else {
            return false;
        };
        scene.reset_all_styles(transition_for(*source));
        tracing::debug!("highlight cleared");
        self.state = HighlightState::Idle;
        true
    }
}

fn transition_for(source: HoverSource) -> Option<Duration> {
    match source {
        HoverSource::Layer(_) => Some(HOVER_TRANSITION),
        HoverSource::TableRow => None,
    }
}

/// Targets that currently have at least one emphasized node.
pub fn active_targets(
    scene: &Scene,
    registry: &NodeRegistry,
    dataset: &Dataset,
) -> Vec<HighlightTarget> {
    let mut seen = FxHashSet::default();
    let mut out = Vec::new();
    for placed in registry.placed() {
        let Some(node) = scene.get(placed.node) else {
            continue;
        };
        let Some(tag) = node.tag else {
            continue;
        };
        if is_emphasized(&node.paint, &node.base) && seen.insert(tag) {
            if let Some(target) = dataset.target(tag) {
                out.push(target.clone());
            }
        }
    }
    out
}
