#![forbid(unsafe_code)]

//! Retained scene graph.
//!
//! A [`Scene`] is an arena of [`Node`]s forming a tree rooted at
//! [`NodeId::ROOT`]. Groups carry a translation and a class; leaves carry a
//! [`Shape`]. Nodes are built once and then mutated in place (positions on
//! resize, paints on hover), which keeps node ids stable for the lifetime of
//! a plot.
//!
//! # Invariants
//!
//! 1. Paint order is depth-first pre-order from the root; later siblings draw
//!    on top.
//! 2. A node is rendered only if it and every ancestor are visible.
//! 3. `reset_style` restores exactly the base paint, whatever sequence of
//!    restyles came before.

use crate::paint::Paint;
use cpviz_core::geometry::{Point, Rect};
use smallvec::SmallVec;
use std::time::Duration;

/// Stable handle to a node in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The root group every scene starts with.
    pub const ROOT: Self = Self(0);

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Opaque entity identity attached to nodes that belong to one data entity.
///
/// The scene does not interpret tags; callers map them to their own keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityTag(pub u32);

/// Horizontal anchoring of text relative to its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

/// Geometry of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Group,
    Polyline(Vec<Point>),
    Line {
        from: Point,
        to: Point,
    },
    Circle {
        center: Point,
        radius: f64,
    },
    Rect(Rect),
    Text {
        origin: Point,
        content: String,
        font_size: f64,
        anchor: TextAnchor,
        /// Rotation in degrees around `origin`.
        rotation: f64,
    },
}

impl Shape {
    /// Local-space bounding box. Text is approximated from its font size.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Shape::Group => None,
            Shape::Polyline(points) => {
                let first = points.first()?;
                let mut r = Rect::new(first.x, first.y, 0.0, 0.0);
                for p in &points[1..] {
                    r = r.union(&Rect::new(p.x, p.y, 0.0, 0.0));
                }
                Some(r)
            }
            Shape::Line { from, to } => Some(Rect::from_points(*from, *to)),
            Shape::Circle { center, radius } => Some(Rect::new(
                center.x - radius,
                center.y - radius,
                2.0 * radius,
                2.0 * radius,
            )),
            Shape::Rect(r) => Some(*r),
            Shape::Text {
                origin,
                content,
                font_size,
                ..
            } => Some(Rect::new(
                origin.x,
                origin.y - font_size,
                content.chars().count() as f64 * font_size * 0.6,
                *font_size,
            )),
        }
    }
}

/// One element of the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Class name, used for lookup and as the SVG `class` attribute.
    pub class: &'static str,
    pub shape: Shape,
    /// Offset applied to this node and its subtree.
    pub translate: Point,
    /// Paint assigned at draw time.
    pub base: Paint,
    /// Paint currently displayed.
    pub paint: Paint,
    /// Duration of the transition that produced the current paint.
    ///
    /// Purely visual; logical state never waits on it.
    pub transition: Option<Duration>,
    pub tag: Option<EntityTag>,
    /// Caller-defined payload (for example an index into a datum table).
    pub data: u64,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
}

impl Node {
    /// A detached node with default paint.
    pub fn new(class: &'static str, shape: Shape) -> Self {
        Self {
            class,
            shape,
            translate: Point::default(),
            base: Paint::default(),
            paint: Paint::default(),
            transition: None,
            tag: None,
            data: 0,
            parent: None,
            children: SmallVec::new(),
        }
    }

    /// A group node.
    pub fn group(class: &'static str) -> Self {
        Self::new(class, Shape::Group)
    }

    /// Set both base and current paint.
    #[must_use]
    pub fn paint(mut self, paint: Paint) -> Self {
        self.base = paint;
        self.paint = paint;
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: EntityTag) -> Self {
        self.tag = Some(tag);
        self
    }

    #[must_use]
    pub fn data(mut self, data: u64) -> Self {
        self.data = data;
        self
    }

    #[must_use]
    pub fn translate(mut self, offset: Point) -> Self {
        self.translate = offset;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena-backed scene tree.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<Option<Node>>,
    live: usize,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// A scene holding only the root group.
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Node::group("root"))],
            live: 1,
        }
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live <= 1
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Attach `node` as the last child of `parent`.
    ///
    /// A missing parent attaches to the root instead.
    pub fn push(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let parent = if self.get(parent).is_some() {
            parent
        } else {
            NodeId::ROOT
        };
        let id = NodeId(self.nodes.len() as u32);
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(Some(node));
        self.live += 1;
        if let Some(p) = self.get_mut(parent) {
            p.children.push(id);
        }
        id
    }

    /// Convenience: push a new group under `parent`.
    pub fn push_group(&mut self, parent: NodeId, class: &'static str) -> NodeId {
        self.push(parent, Node::group(class))
    }

    /// Children of `id`, empty if `id` is gone.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    /// Remove every descendant of `id`, keeping `id` itself.
    pub fn clear_children(&mut self, id: NodeId) {
        let children: SmallVec<[NodeId; 4]> = match self.get_mut(id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            self.remove_subtree(child);
        }
    }

    fn remove_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(next.index()).and_then(Option::take) {
                self.live -= 1;
                stack.extend(node.children);
            }
        }
    }

    /// Drop everything except an empty root.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        if let Some(root) = self.get_mut(NodeId::ROOT) {
            root.children.clear();
        }
        self.live = 1;
    }

    /// Depth-first pre-order traversal of the subtree at `id` (paint order).
    pub fn walk(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.get(next) {
                out.push(next);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Descendants of `id` (inclusive) whose class is `class`, in paint order.
    pub fn find_class(&self, id: NodeId, class: &str) -> Vec<NodeId> {
        self.walk(id)
            .into_iter()
            .filter(|n| self.get(*n).is_some_and(|node| node.class == class))
            .collect()
    }

    /// All live nodes carrying `tag`.
    pub fn tagged(&self, tag: EntityTag) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().enumerate().filter_map(move |(i, n)| {
            n.as_ref()
                .filter(|node| node.tag == Some(tag))
                .map(|_| NodeId(i as u32))
        })
    }

    /// Sum of translations from the root down to and including `id`.
    pub fn absolute_origin(&self, id: NodeId) -> Point {
        let mut origin = Point::default();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            match self.get(current) {
                Some(node) => {
                    origin = origin.offset(node.translate.x, node.translate.y);
                    cursor = node.parent;
                }
                None => break,
            }
        }
        origin
    }

    /// True if `id` and all its ancestors are visible.
    pub fn is_rendered(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            match self.get(current) {
                Some(node) if node.paint.visible => cursor = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Structural show/hide: changes both base and current visibility.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(node) = self.get_mut(id) {
            node.base.visible = visible;
            node.paint.visible = visible;
        }
    }

    pub fn set_translate(&mut self, id: NodeId, offset: Point) {
        if let Some(node) = self.get_mut(id) {
            node.translate = offset;
        }
    }

    pub fn set_shape(&mut self, id: NodeId, shape: Shape) {
        if let Some(node) = self.get_mut(id) {
            node.shape = shape;
        }
    }

    /// Display `paint` without touching the base paint.
    pub fn restyle(&mut self, id: NodeId, paint: Paint, transition: Option<Duration>) {
        if let Some(node) = self.get_mut(id) {
            node.paint = paint;
            node.transition = transition;
        }
    }

    /// Restore the base paint.
    pub fn reset_style(&mut self, id: NodeId, transition: Option<Duration>) {
        if let Some(node) = self.get_mut(id) {
            node.paint = node.base;
            node.transition = transition;
        }
    }

    /// Restore the base paint of every live node.
    pub fn reset_all_styles(&mut self, transition: Option<Duration>) {
        for node in self.nodes.iter_mut().flatten() {
            if node.paint != node.base {
                node.paint = node.base;
                node.transition = transition;
            }
        }
    }
}
