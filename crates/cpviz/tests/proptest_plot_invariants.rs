//! Property tests for the plot engine.
//!
//! 1. Color round-trip: for any `v` in the color domain,
//!    `apply(v) == apply(bucket_label_for(v))`.
//! 2. Bucket coverage: every `v` in `[min, max]` lies in exactly one bucket,
//!    and `max` lies in the last one.
//! 3. Resize stability: a resize within one pixel of the current chart size
//!    changes neither the geometry nor any scale range.
//! 4. Highlight exclusivity: after an enter on key K exactly K is active;
//!    after a leave nothing is active and every paint equals its base.
//! 5. Residual endpoints are `(x(value), y(predicted))` and
//!    `(x(value), y(actual))` exactly.

use cpviz::highlight::active_targets;
use cpviz::prelude::*;
use cpviz::scale::{ColorScale, QuantizedColor};
use cpviz::{LayerKind, NodeKind};
use cpviz_render::{Rgba, Shape};
use proptest::prelude::*;

const FALLBACK: Rgba = Rgba::from_hex(0x191970);

fn build(n: usize, seed: &[(f64, f64, f64)]) -> Plot {
    let mut profiles = Vec::new();
    let mut observations = Vec::new();
    for (i, &(x, predicted, actual)) in seed.iter().take(n).enumerate() {
        let id = i.to_string();
        profiles.push(ProfilePoint::new(id.as_str(), "lm", "x", 0.0, predicted - 1.0));
        profiles.push(ProfilePoint::new(id.as_str(), "lm", "x", 10.0, predicted + 1.0));
        observations.push(
            Observation::new(id.as_str(), "lm", predicted, Some(actual)).with_feature("x", x),
        );
    }
    let container = Container::new(800.0, 800.0);
    create_plot(
        Some(&container),
        profiles,
        observations,
        &PlotOptions::with_variables(["x"]),
    )
    .expect("valid input")
}

fn rows() -> impl Strategy<Value = Vec<(f64, f64, f64)>> {
    prop::collection::vec((0.0f64..10.0, -50.0f64..50.0, -50.0f64..50.0), 1..6)
}

proptest! {
    #[test]
    fn color_round_trip(min in -100.0f64..100.0, span in 0.01f64..500.0, count in 1usize..10, t in 0.0f64..=1.0) {
        let max = min + span;
        let scale = QuantizedColor::new(min, max, count, FALLBACK);
        let v = Value::from(min + t * span);
        let label = scale.bucket_label_for(&v).expect("value in domain");
        prop_assert_eq!(scale.apply(&v), scale.apply(&Value::Text(label)));
    }

    #[test]
    fn buckets_cover_the_domain(min in -100.0f64..100.0, span in 0.01f64..500.0, count in 1usize..10, t in 0.0f64..=1.0) {
        let max = min + span;
        let scale = QuantizedColor::new(min, max, count, FALLBACK);
        let v = (min + t * span).min(max);
        let holders = (0..scale.bucket_count())
            .filter(|&b| scale.bucket_contains(b, v))
            .count();
        prop_assert_eq!(holders, 1);
        prop_assert!(scale.bucket_contains(scale.bucket_count() - 1, max));
        prop_assert_eq!(scale.bucket_index(max), scale.bucket_count() - 1);
    }

    #[test]
    fn sub_pixel_resize_is_stable(
        w in 200.0f64..2000.0,
        h in 200.0f64..2000.0,
        dw in -0.99f64..0.99,
        dh in -0.99f64..0.99,
        seed in rows(),
    ) {
        let mut plot = build(seed.len(), &seed);
        plot.resize(w, h);
        let chart = plot.frame().chart;
        let geometry = *plot.geometry();
        let outcome = plot.scales().outcome().range();
        let x = plot.scales().variable("x").map(|s| s.range());

        // The table takes half of the viewport height.
        prop_assert!(!plot.resize(chart.width + dw, chart.height * 2.0 + dh));
        prop_assert_eq!(*plot.geometry(), geometry);
        prop_assert_eq!(plot.scales().outcome().range(), outcome);
        prop_assert_eq!(plot.scales().variable("x").map(|s| s.range()), x);
    }

    #[test]
    fn one_highlight_at_a_time(
        seed in rows(),
        ops in prop::collection::vec((prop::option::of(0usize..8), any::<bool>()), 1..24),
    ) {
        let mut plot = build(seed.len(), &seed);
        for (op, from_table) in ops {
            match op {
                Some(i) => {
                    let key = JoinKey::new((i % seed.len()).to_string(), "lm");
                    let source = if from_table {
                        HoverSource::TableRow
                    } else {
                        HoverSource::Layer(LayerKind::Profiles)
                    };
                    plot.hover_enter(HighlightTarget::Entity(key.clone()), source);
                    prop_assert_eq!(
                        active_targets(plot.scene(), plot.registry(), plot.dataset()),
                        vec![HighlightTarget::Entity(key)]
                    );
                }
                None => {
                    plot.hover_leave();
                    prop_assert!(active_targets(plot.scene(), plot.registry(), plot.dataset()).is_empty());
                    for placed in plot.registry().placed() {
                        let node = plot.scene().get(placed.node).expect("drawn");
                        prop_assert_eq!(node.paint, node.base);
                    }
                }
            }
        }
    }

    #[test]
    fn residual_endpoints_are_exact(seed in rows()) {
        let plot = build(seed.len(), &seed);
        let x = plot.scales().variable("x").expect("numeric scale");
        let y = plot.scales().outcome();
        let mut seen = 0;
        for placed in plot.registry().of_kind(NodeKind::ResidualLine) {
            let node = plot.scene().get(placed.node).expect("drawn");
            let Shape::Line { from, to } = node.shape.clone() else {
                panic!("residual is a line");
            };
            let Some(HighlightTarget::Entity(key)) = node.tag.and_then(|t| plot.dataset().target(t)) else {
                panic!("residual tagged by entity");
            };
            let obs = plot.dataset().observation(key).expect("joined");
            let px = x.apply(obs.feature("x").expect("feature")).expect("numeric");
            prop_assert_eq!((from.x, from.y), (px, y.apply(obs.predicted)));
            prop_assert_eq!((to.x, to.y), (px, y.apply(obs.actual.expect("actual"))));
            seen += 1;
        }
        prop_assert_eq!(seen, seed.len());
    }
}
