//! Property tests for scene restyling.
//!
//! 1. Any sequence of restyles followed by `reset_style` restores the base
//!    paint exactly.
//! 2. Restyling never changes the base paint.
//! 3. `walk` visits every live node exactly once.

use cpviz_core::geometry::Point;
use cpviz_render::{Node, NodeId, Paint, Rgba, Scene, Shape};
use proptest::prelude::*;

fn paint_strategy() -> impl Strategy<Value = Paint> {
    (0.0f64..10.0, 0.0f64..1.0, any::<bool>(), any::<u32>()).prop_map(|(w, o, vis, c)| {
        let p = Paint::stroked(Rgba(c), w).with_opacity(o);
        if vis { p } else { p.hidden() }
    })
}

proptest! {
    #[test]
    fn reset_restores_base(base in paint_strategy(), edits in prop::collection::vec(paint_strategy(), 0..8)) {
        let mut scene = Scene::new();
        let id = scene.push(
            NodeId::ROOT,
            Node::new("n", Shape::Circle { center: Point::new(0.0, 0.0), radius: 1.0 }).paint(base),
        );
        for e in edits {
            scene.restyle(id, e, None);
            prop_assert_eq!(scene.get(id).map(|n| n.base), Some(base));
        }
        scene.reset_style(id, None);
        prop_assert_eq!(scene.get(id).map(|n| n.paint), Some(base));
    }

    #[test]
    fn walk_visits_each_node_once(parents in prop::collection::vec(0usize..16, 1..40)) {
        let mut scene = Scene::new();
        let mut ids = vec![NodeId::ROOT];
        for p in parents {
            let parent = ids[p % ids.len()];
            ids.push(scene.push_group(parent, "g"));
        }
        let mut walked = scene.walk(NodeId::ROOT);
        prop_assert_eq!(walked.len(), scene.len());
        walked.sort();
        walked.dedup();
        prop_assert_eq!(walked.len(), ids.len());
    }
}
