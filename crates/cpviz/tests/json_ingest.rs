//! Building a plot from the JSON row format.
//!
//! Uses the sample data shipped with the demo binary: two models, three
//! observations, a numeric and a categorical variable, colored by model
//! label with a mean aggregate.

use cpviz::data::{observations_from_json, profiles_from_json};
use cpviz::prelude::*;
use cpviz::{ColorMode, NodeKind};
use pretty_assertions::assert_eq;

const PROFILES: &str = include_str!("../../cpviz-demo/data/profiles.json");
const OBSERVATIONS: &str = include_str!("../../cpviz-demo/data/observations.json");
const OPTIONS: &str = include_str!("../../cpviz-demo/data/options.json");

fn sample() -> Plot {
    let profiles = profiles_from_json(&serde_json::from_str(PROFILES).expect("json"))
        .expect("profile rows");
    let observations = observations_from_json(&serde_json::from_str(OBSERVATIONS).expect("json"))
        .expect("observation rows");
    let options = PlotOptions::from_json(OPTIONS).expect("options");
    let container = Container::new(800.0, 800.0);
    create_plot(Some(&container), profiles, observations, &options).expect("valid sample")
}

#[test]
fn sample_builds_both_cells() {
    let plot = sample();
    assert!(plot.cell_errors().is_empty());
    assert_eq!((plot.geometry().rows, plot.geometry().cols), (1, 2));
    // 3 observations x 2 models, in each of 2 cells.
    assert_eq!(plot.registry().of_kind(NodeKind::ProfileLine).count(), 12);
    // One aggregate line per model per cell.
    assert_eq!(plot.registry().of_kind(NodeKind::AggregateLine).count(), 4);
}

#[test]
fn label_column_colors_by_model() {
    let plot = sample();
    let color = plot.scales().color();
    assert_eq!(color.mode(), ColorMode::Categorical);
    assert_eq!(color.domain(), vec!["lm", "rf"]);
    let legend = plot.legend().expect("legend");
    assert_eq!(legend.title, "_label_:");

    for placed in plot.registry().of_kind(NodeKind::AggregateLine) {
        let node = plot.scene().get(placed.node).expect("drawn");
        let Some(HighlightTarget::Model(model)) = node.tag.and_then(|t| plot.dataset().target(t))
        else {
            panic!("aggregate tagged by model");
        };
        assert_eq!(node.base.stroke, Some(color.apply(&Value::from(model.as_str()))));
    }
}

#[test]
fn categorical_order_from_options() {
    let plot = sample();
    let Some(cpviz::scale::VariableScale::Point(scale)) = plot.scales().variable("region") else {
        panic!("region is categorical");
    };
    assert_eq!(scale.domain(), &["north", "south", "west"].map(String::from));
}

#[test]
fn table_lists_every_observation() {
    let plot = sample();
    let table = plot.table().expect("add_table defaults to true");
    assert_eq!(table.len(), 6);
    assert_eq!(
        table.columns(),
        &["age", "region", "_yhat_", "_label_", "_ids_", "_y_"].map(String::from)
    );
}
