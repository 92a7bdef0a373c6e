#![forbid(unsafe_code)]

//! Plot options.
//!
//! [`PlotOptions`] mirrors the options document: every field is optional and
//! an explicit `null` means the same as an absent field. [`PlotOptions::resolve`]
//! applies defaults and validates, producing [`ResolvedOptions`].

use crate::error::{OptionsError, PlotError, Result};
use crate::layers::LayerSet;
use cpviz_core::geometry::Sides;
use cpviz_layout::{FontClass, Typography};
use cpviz_render::Rgba;
use cpviz_style::parse_color;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Default color of profile lines and points.
pub const DEFAULT_COLOR: &str = "MidnightBlue";
/// Default color of aggregate lines.
pub const DEFAULT_AGGREGATE_COLOR: &str = "red";

/// Reduction used for aggregate profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Mean,
    Median,
}

impl Aggregate {
    /// Reduce `values`; `None` when empty.
    pub fn reduce(self, values: &mut [f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        match self {
            Aggregate::Mean => Some(values.iter().sum::<f64>() / values.len() as f64),
            Aggregate::Median => {
                values.sort_by(f64::total_cmp);
                let mid = values.len() / 2;
                if values.len() % 2 == 1 {
                    Some(values[mid])
                } else {
                    Some((values[mid - 1] + values[mid]) / 2.0)
                }
            }
        }
    }
}

/// Options document. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    pub variables: Option<Vec<String>>,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub color: Option<String>,
    pub no_colors: Option<usize>,
    pub add_table: Option<bool>,
    pub categorical_order: Option<JsonValue>,
    pub show_profiles: Option<bool>,
    pub show_observations: Option<bool>,
    pub show_rugs: Option<bool>,
    pub show_residuals: Option<bool>,
    pub aggregate_profiles: Option<JsonValue>,

    pub size_ices: Option<f64>,
    pub alpha_ices: Option<f64>,
    pub size_points: Option<f64>,
    pub alpha_points: Option<f64>,
    pub size_rugs: Option<f64>,
    pub alpha_rugs: Option<f64>,
    pub size_residuals: Option<f64>,
    pub alpha_residuals: Option<f64>,
    pub size_pdps: Option<f64>,
    pub alpha_pdps: Option<f64>,

    pub color_points: Option<String>,
    pub color_rugs: Option<String>,
    pub color_residuals: Option<String>,
    pub color_pdps: Option<String>,
    pub default_color: Option<String>,

    pub font_size_titles: Option<f64>,
    pub font_size_legend: Option<f64>,
    pub font_size_axes: Option<f64>,
    pub font_size_tooltips: Option<f64>,
    pub font_size_table: Option<f64>,
}

impl PlotOptions {
    /// Parse an options document.
    pub fn from_json(doc: &str) -> std::result::Result<Self, OptionsError> {
        serde_json::from_str(doc).map_err(|e| OptionsError::Json(e.to_string()))
    }

    /// Options plotting `variables`, everything else default.
    pub fn with_variables<I, S>(variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            variables: Some(variables.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Apply defaults and validate.
    pub fn resolve(&self) -> Result<ResolvedOptions> {
        let variables = match &self.variables {
            Some(v) if !v.is_empty() => v.clone(),
            _ => {
                return Err(PlotError::Configuration(
                    "option `variables` is required and must not be empty".into(),
                ));
            }
        };

        let mut layers = LayerSet::empty();
        layers.set(LayerSet::PROFILES, self.show_profiles.unwrap_or(true));
        layers.set(LayerSet::OBSERVATIONS, self.show_observations.unwrap_or(true));
        layers.set(LayerSet::RUGS, self.show_rugs.unwrap_or(true));
        layers.set(LayerSet::RESIDUALS, self.show_residuals.unwrap_or(true));
        let aggregate = parse_aggregate(self.aggregate_profiles.as_ref())?;
        layers.set(LayerSet::AGGREGATES, aggregate.is_some());

        let mut typography = Typography::default();
        for (class, size) in [
            (FontClass::Titles, self.font_size_titles),
            (FontClass::Legend, self.font_size_legend),
            (FontClass::Axes, self.font_size_axes),
            (FontClass::Tooltips, self.font_size_tooltips),
            (FontClass::Table, self.font_size_table),
        ] {
            if let Some(size) = size {
                typography = typography.pinned(class, size);
            }
        }

        let default_color = color_or(self.default_color.as_deref(), DEFAULT_COLOR);
        Ok(ResolvedOptions {
            variables,
            width: self.width.unwrap_or(600.0),
            height: self.height.unwrap_or(400.0),
            color: self.color.clone().filter(|c| !c.is_empty()),
            no_colors: self.no_colors.unwrap_or(3),
            add_table: self.add_table.unwrap_or(true),
            categorical_order: parse_categorical_order(self.categorical_order.as_ref())?,
            layers,
            aggregate,
            ices: LayerStyle::new(self.size_ices, 2.5, self.alpha_ices, 0.4),
            points: LayerStyle::new(self.size_points, 3.0, self.alpha_points, 0.9),
            rugs: LayerStyle::new(self.size_rugs, 1.0, self.alpha_rugs, 0.9),
            residuals: LayerStyle::new(self.size_residuals, 2.0, self.alpha_residuals, 0.9),
            pdps: LayerStyle::new(self.size_pdps, 6.5, self.alpha_pdps, 0.4),
            color_points: self.color_points.as_deref().map(|c| color_or(Some(c), DEFAULT_COLOR)),
            color_rugs: self.color_rugs.as_deref().map(|c| color_or(Some(c), DEFAULT_COLOR)),
            color_residuals: self
                .color_residuals
                .as_deref()
                .map(|c| color_or(Some(c), DEFAULT_COLOR)),
            color_pdps: color_or(self.color_pdps.as_deref(), DEFAULT_AGGREGATE_COLOR),
            default_color,
            typography,
            margin: Sides::new(10.0, 10.0, 40.0, 40.0),
        })
    }
}

/// Parse a color, falling back to `fallback` (which must be valid) with a
/// warning.
pub(crate) fn color_or(value: Option<&str>, fallback: &str) -> Rgba {
    let fallback_rgba = parse_color(fallback).unwrap_or(Rgba::BLACK);
    match value {
        None => fallback_rgba,
        Some(s) => parse_color(s).unwrap_or_else(|err| {
            tracing::warn!(color = s, error = %err, fallback, "unusable color, using fallback");
            fallback_rgba
        }),
    }
}

fn parse_aggregate(value: Option<&JsonValue>) -> std::result::Result<Option<Aggregate>, OptionsError> {
    match value {
        None | Some(JsonValue::Null) | Some(JsonValue::Bool(false)) => Ok(None),
        Some(JsonValue::String(s)) if s.is_empty() => Ok(None),
        Some(JsonValue::String(s)) => match s.to_ascii_lowercase().as_str() {
            "mean" => Ok(Some(Aggregate::Mean)),
            "median" => Ok(Some(Aggregate::Median)),
            _ => Err(OptionsError::UnknownAggregate(s.clone())),
        },
        Some(JsonValue::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(other) => Err(OptionsError::UnknownAggregate(other.to_string())),
    }
}

/// Explicit category order per variable.
///
/// Accepts a map `{ "var": ["a", "b"] }` or a list of records
/// `{ "variable": "var", "0": "a", "1": "b" }`.
fn parse_categorical_order(
    value: Option<&JsonValue>,
) -> std::result::Result<FxHashMap<String, Vec<String>>, OptionsError> {
    let mut out = FxHashMap::default();
    match value {
        Some(JsonValue::Object(map)) => {
            for (variable, order) in map {
                if let JsonValue::Array(items) = order {
                    out.insert(variable.clone(), items.iter().filter_map(category).collect());
                }
            }
        }
        Some(JsonValue::Array(records)) => {
            for record in records {
                let Some(fields) = record.as_object() else {
                    continue;
                };
                let variable = fields
                    .get("variable")
                    .and_then(JsonValue::as_str)
                    .ok_or(OptionsError::OrderWithoutVariable)?;
                // Index keys give the order; any other keys follow in input order.
                let mut entries: Vec<(Option<usize>, &JsonValue)> = fields
                    .iter()
                    .filter(|(k, _)| k.as_str() != "variable")
                    .map(|(k, v)| (k.parse::<usize>().ok(), v))
                    .collect();
                entries.sort_by_key(|(index, _)| index.unwrap_or(usize::MAX));
                let order = entries.into_iter().filter_map(|(_, v)| category(v)).collect();
                out.entry(variable.to_string()).or_insert(order);
            }
        }
        _ => {}
    }
    Ok(out)
}

fn category(v: &JsonValue) -> Option<String> {
    match v {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(crate::data::Value::from_json(other).to_string()),
    }
}

/// Size and opacity of one layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStyle {
    pub size: f64,
    pub alpha: f64,
}

impl LayerStyle {
    fn new(size: Option<f64>, default_size: f64, alpha: Option<f64>, default_alpha: f64) -> Self {
        Self {
            size: size.unwrap_or(default_size),
            alpha: alpha.unwrap_or(default_alpha).clamp(0.0, 1.0),
        }
    }
}

/// Options with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    pub variables: Vec<String>,
    pub width: f64,
    pub height: f64,
    /// Color encoding: a column name, or a literal color for profile lines.
    pub color: Option<String>,
    pub no_colors: usize,
    pub add_table: bool,
    pub categorical_order: FxHashMap<String, Vec<String>>,
    pub layers: LayerSet,
    pub aggregate: Option<Aggregate>,
    pub ices: LayerStyle,
    pub points: LayerStyle,
    pub rugs: LayerStyle,
    pub residuals: LayerStyle,
    pub pdps: LayerStyle,
    pub color_points: Option<Rgba>,
    pub color_rugs: Option<Rgba>,
    pub color_residuals: Option<Rgba>,
    pub color_pdps: Rgba,
    pub default_color: Rgba,
    pub typography: Typography,
    pub margin: Sides,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_applied() {
        let o = PlotOptions::with_variables(["x"]).resolve().unwrap();
        assert_eq!((o.width, o.height), (600.0, 400.0));
        assert_eq!(o.no_colors, 3);
        assert!(o.add_table);
        assert_eq!(o.layers, LayerSet::DEFAULT);
        assert_eq!(o.aggregate, None);
        assert_eq!(o.ices, LayerStyle { size: 2.5, alpha: 0.4 });
        assert_eq!(o.pdps, LayerStyle { size: 6.5, alpha: 0.4 });
        assert_eq!(o.default_color, Rgba::from_hex(0x191970));
        assert_eq!(o.color_pdps, Rgba::rgb(255, 0, 0));
        assert_eq!(o.typography.size(FontClass::Titles), 14.0);
        assert!(o.typography.pins().is_empty());
    }

    #[test]
    fn missing_variables_is_configuration_error() {
        let err = PlotOptions::default().resolve().unwrap_err();
        assert!(matches!(err, PlotError::Configuration(_)));
        let err = PlotOptions::with_variables(Vec::<String>::new())
            .resolve()
            .unwrap_err();
        assert!(matches!(err, PlotError::Configuration(_)));
    }

    #[test]
    fn null_means_default() {
        let o = PlotOptions::from_json(
            r#"{"variables": ["x"], "height": null, "show_rugs": null, "size_points": null}"#,
        )
        .unwrap()
        .resolve()
        .unwrap();
        assert_eq!(o.height, 400.0);
        assert!(o.layers.contains(LayerSet::RUGS));
        assert_eq!(o.points.size, 3.0);
    }

    #[test]
    fn aggregate_parsing() {
        let parse = |v: JsonValue| parse_aggregate(Some(&v));
        assert_eq!(parse(json!("mean")), Ok(Some(Aggregate::Mean)));
        assert_eq!(parse(json!("median")), Ok(Some(Aggregate::Median)));
        assert_eq!(parse(json!(false)), Ok(None));
        assert_eq!(parse(json!("")), Ok(None));
        assert!(parse(json!("mode")).is_err());
    }

    #[test]
    fn aggregate_enables_layer() {
        let mut opts = PlotOptions::with_variables(["x"]);
        opts.aggregate_profiles = Some(json!("median"));
        opts.show_profiles = Some(false);
        let o = opts.resolve().unwrap();
        assert!(o.layers.contains(LayerSet::AGGREGATES));
        assert!(!o.layers.contains(LayerSet::PROFILES));
    }

    #[test]
    fn categorical_order_record_form() {
        let v = json!([{"variable": "size", "0": "small", "1": "large", "2": null}]);
        let order = parse_categorical_order(Some(&v)).unwrap();
        assert_eq!(order["size"], vec!["small", "large"]);
    }

    #[test]
    fn categorical_order_records_follow_index_keys() {
        let v = json!([
            {"variable": "g", "10": "k", "1": "b", "0": "a", "2": "c"},
            {"variable": "g", "0": "z"},
        ]);
        let order = parse_categorical_order(Some(&v)).unwrap();
        assert_eq!(order["g"], vec!["a", "b", "c", "k"]);
    }

    #[test]
    fn categorical_order_map_form() {
        let v = json!({"size": ["large", "small"]});
        let order = parse_categorical_order(Some(&v)).unwrap();
        assert_eq!(order["size"], vec!["large", "small"]);
    }

    #[test]
    fn categorical_order_without_variable_rejected() {
        let v = json!([{"0": "a"}]);
        assert_eq!(
            parse_categorical_order(Some(&v)),
            Err(OptionsError::OrderWithoutVariable)
        );
    }

    #[test]
    fn font_sizes_pin() {
        let mut opts = PlotOptions::with_variables(["x"]);
        opts.font_size_axes = Some(9.0);
        let o = opts.resolve().unwrap();
        assert!(o.typography.is_pinned(FontClass::Axes));
        assert_eq!(o.typography.size(FontClass::Axes), 9.0);
    }

    #[test]
    fn bad_override_color_falls_back() {
        let mut opts = PlotOptions::with_variables(["x"]);
        opts.color_points = Some("not-a-color".into());
        let o = opts.resolve().unwrap();
        assert_eq!(o.color_points, Some(Rgba::from_hex(0x191970)));
    }

    #[test]
    fn aggregate_reductions() {
        assert_eq!(Aggregate::Mean.reduce(&mut [1.0, 2.0, 6.0]), Some(3.0));
        assert_eq!(Aggregate::Median.reduce(&mut [6.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(Aggregate::Median.reduce(&mut [4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(Aggregate::Mean.reduce(&mut []), None);
    }
}
