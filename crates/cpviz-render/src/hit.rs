#![forbid(unsafe_code)]

//! Pointer hit testing over tagged scene nodes.
//!
//! # Design
//!
//! - **Snapshot**: [`HitIndex::build`] walks the scene once and records every
//!   rendered node that carries an [`EntityTag`], in absolute coordinates.
//! - **Uniform grid**: the covered area is divided into square buckets
//!   (default 16px); each bucket lists the entries overlapping it.
//! - **Z-order**: paint order. On overlap the entry drawn last wins.
//!
//! Opacity does not affect hit testing; a fully transparent circle is still
//! a target. Hidden nodes are excluded.
//!
//! The index is a snapshot: rebuild it after positions or visibility change.

use crate::scene::{EntityTag, NodeId, Scene, Shape};
use cpviz_core::geometry::{Point, Rect};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the hit index.
#[derive(Debug, Clone)]
pub struct HitConfig {
    /// Bucket edge length in pixels (default: 16).
    pub bucket_size: f64,
    /// Extra slack around strokes and circles in pixels (default: 2).
    pub tolerance: f64,
}

impl Default for HitConfig {
    fn default() -> Self {
        Self {
            bucket_size: 16.0,
            tolerance: 2.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum HitGeometry {
    Circle { center: Point, radius: f64 },
    Segments { points: Vec<Point>, half_width: f64 },
    Area(Rect),
}

impl HitGeometry {
    fn contains(&self, p: Point) -> bool {
        match self {
            HitGeometry::Circle { center, radius } => center.distance(p) <= *radius,
            HitGeometry::Segments { points, half_width } => points
                .windows(2)
                .any(|w| segment_distance(p, w[0], w[1]) <= *half_width),
            HitGeometry::Area(r) => r.contains(p),
        }
    }
}

/// A hit-test result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub node: NodeId,
    pub tag: EntityTag,
    pub class: &'static str,
    pub data: u64,
}

#[derive(Debug, Clone)]
struct HitEntry {
    hit: Hit,
    bounds: Rect,
    geometry: HitGeometry,
}

/// Distance from `p` to the segment `a`-`b`.
fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

// ---------------------------------------------------------------------------
// Index
// ---------------------------------------------------------------------------

/// Grid-bucketed hit index built from a scene snapshot.
#[derive(Debug, Clone)]
pub struct HitIndex {
    config: HitConfig,
    origin: Point,
    cols: usize,
    rows: usize,
    buckets: Vec<Vec<usize>>,
    entries: Vec<HitEntry>,
}

impl HitIndex {
    /// Index every rendered, tagged node of `scene`.
    pub fn build(scene: &Scene, config: HitConfig) -> Self {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("cpviz.render.hit_index").entered();

        let mut entries = Vec::new();
        for id in scene.walk(NodeId::ROOT) {
            let Some(node) = scene.get(id) else { continue };
            let Some(tag) = node.tag else { continue };
            if !scene.is_rendered(id) {
                continue;
            }
            let o = scene.absolute_origin(id);
            let slack = config.tolerance;
            let geometry = match &node.shape {
                Shape::Group => continue,
                Shape::Circle { center, radius } => HitGeometry::Circle {
                    center: center.offset(o.x, o.y),
                    radius: radius + node.paint.stroke_width / 2.0 + slack,
                },
                Shape::Polyline(points) => HitGeometry::Segments {
                    points: points.iter().map(|p| p.offset(o.x, o.y)).collect(),
                    half_width: node.paint.stroke_width / 2.0 + slack,
                },
                Shape::Line { from, to } => HitGeometry::Segments {
                    points: vec![from.offset(o.x, o.y), to.offset(o.x, o.y)],
                    half_width: node.paint.stroke_width / 2.0 + slack,
                },
                Shape::Rect(_) | Shape::Text { .. } => match node.shape.bounds() {
                    Some(b) => HitGeometry::Area(Rect::new(b.x + o.x, b.y + o.y, b.width, b.height)),
                    None => continue,
                },
            };
            let Some(local) = node.shape.bounds() else {
                continue;
            };
            let pad = node.paint.stroke_width / 2.0 + slack;
            let bounds = Rect::new(local.x + o.x, local.y + o.y, local.width, local.height)
                .inflate(pad);
            entries.push(HitEntry {
                hit: Hit {
                    node: id,
                    tag,
                    class: node.class,
                    data: node.data,
                },
                bounds,
                geometry,
            });
        }

        let area = entries
            .iter()
            .map(|e| e.bounds)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default();
        let size = config.bucket_size.max(1.0);
        let cols = ((area.width / size).floor() as usize).saturating_add(1);
        let rows = ((area.height / size).floor() as usize).saturating_add(1);
        let mut index = Self {
            config,
            origin: Point::new(area.x, area.y),
            cols,
            rows,
            buckets: vec![Vec::new(); cols * rows],
            entries,
        };
        for (i, entry) in index.entries.iter().enumerate() {
            let (c0, r0) = index.bucket_of(Point::new(entry.bounds.x, entry.bounds.y));
            let (c1, r1) = index.bucket_of(Point::new(entry.bounds.right(), entry.bounds.bottom()));
            for r in r0..=r1 {
                for c in c0..=c1 {
                    index.buckets[r * index.cols + c].push(i);
                }
            }
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(entries = index.entries.len(), cols, rows, "hit index built");
        index
    }

    /// Build with [`HitConfig::default`].
    pub fn with_defaults(scene: &Scene) -> Self {
        Self::build(scene, HitConfig::default())
    }

    fn bucket_of(&self, p: Point) -> (usize, usize) {
        let size = self.config.bucket_size.max(1.0);
        let c = ((p.x - self.origin.x) / size).floor().max(0.0) as usize;
        let r = ((p.y - self.origin.y) / size).floor().max(0.0) as usize;
        (c.min(self.cols - 1), r.min(self.rows - 1))
    }

    /// Topmost entry under `p`.
    pub fn hit_test(&self, p: Point) -> Option<Hit> {
        if self.entries.is_empty() || !p.x.is_finite() || !p.y.is_finite() {
            return None;
        }
        let (c, r) = self.bucket_of(p);
        self.buckets[r * self.cols + c]
            .iter()
            .rev()
            .map(|&i| &self.entries[i])
            .find(|e| e.bounds.contains(p) && e.geometry.contains(p))
            .map(|e| e.hit)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
