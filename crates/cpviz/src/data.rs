#![forbid(unsafe_code)]

//! Input data model.
//!
//! Two immutable tables feed a plot:
//!
//! - [`ProfilePoint`] rows: one per (observation, model, variable, grid value),
//!   giving the prediction with that one variable substituted.
//! - [`Observation`] rows: one per (observation, model), carrying the real
//!   feature values, the prediction and optionally the actual outcome.
//!
//! Rows are correlated by [`JoinKey`]. A [`Dataset`] owns both tables, the
//! join index, and the entity tags layers attach to scene nodes.

use crate::error::{PlotError, Result};
use crate::highlight::HighlightTarget;
use cpviz_render::EntityTag;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// Reserved column: observation id.
pub const IDS_COLUMN: &str = "_ids_";
/// Reserved column: model label.
pub const LABEL_COLUMN: &str = "_label_";
/// Reserved column: name of the varied variable (profile rows only).
pub const VNAME_COLUMN: &str = "_vname_";
/// Reserved column: predicted outcome.
pub const YHAT_COLUMN: &str = "_yhat_";
/// Reserved column: actual outcome.
pub const Y_COLUMN: &str = "_y_";

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// A scalar cell value.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    /// Convert a JSON value. Arrays and objects have no scalar reading and
    /// become `Null`.
    pub fn from_json(v: &JsonValue) -> Self {
        match v {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(*b),
            JsonValue::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            JsonValue::String(s) => Self::Text(s.clone()),
            JsonValue::Array(_) | JsonValue::Object(_) => Self::Null,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// `Null` or the empty string.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Name of the runtime kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Text(_) => "string",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

// ---------------------------------------------------------------------------
// Join key
// ---------------------------------------------------------------------------

/// Identity of one (observation, model) pair.
///
/// Structural equality on both fields; no separator parsing involved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JoinKey {
    pub observation_id: String,
    pub model_label: String,
}

impl JoinKey {
    pub fn new(observation_id: impl Into<String>, model_label: impl Into<String>) -> Self {
        Self {
            observation_id: observation_id.into(),
            model_label: model_label.into(),
        }
    }
}

impl fmt::Display for JoinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.observation_id, self.model_label)
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// One sampled point of one profile.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePoint {
    pub observation_id: String,
    pub model_label: String,
    pub variable: String,
    /// The substituted value of `variable`.
    pub value: Value,
    pub predicted: f64,
}

impl ProfilePoint {
    pub fn new(
        observation_id: impl Into<String>,
        model_label: impl Into<String>,
        variable: impl Into<String>,
        value: impl Into<Value>,
        predicted: f64,
    ) -> Self {
        Self {
            observation_id: observation_id.into(),
            model_label: model_label.into(),
            variable: variable.into(),
            value: value.into(),
            predicted,
        }
    }

    pub fn join_key(&self) -> JoinKey {
        JoinKey::new(self.observation_id.clone(), self.model_label.clone())
    }

    /// Convert a profile row of the JSON export format: reserved columns
    /// plus every variable column, the varied one named by `_vname_`.
    pub fn from_json_row(row: &Map<String, JsonValue>) -> Result<Self> {
        let variable = required_text(row, VNAME_COLUMN)?;
        Ok(Self {
            observation_id: required_text(row, IDS_COLUMN)?,
            model_label: required_text(row, LABEL_COLUMN)?,
            value: row.get(&variable).map(Value::from_json).unwrap_or_default(),
            predicted: required_number(row, YHAT_COLUMN)?,
            variable,
        })
    }
}

/// One observed (observation, model) row.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub observation_id: String,
    pub model_label: String,
    pub predicted: f64,
    /// Actual outcome; `None` when unknown.
    pub actual: Option<f64>,
    /// Feature columns in input order.
    pub features: Vec<(String, Value)>,
}

impl Observation {
    pub fn new(
        observation_id: impl Into<String>,
        model_label: impl Into<String>,
        predicted: f64,
        actual: Option<f64>,
    ) -> Self {
        Self {
            observation_id: observation_id.into(),
            model_label: model_label.into(),
            predicted,
            actual,
            features: Vec::new(),
        }
    }

    /// Builder: append a feature column.
    #[must_use]
    pub fn with_feature(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.features.push((name.into(), value.into()));
        self
    }

    pub fn join_key(&self) -> JoinKey {
        JoinKey::new(self.observation_id.clone(), self.model_label.clone())
    }

    /// Feature value by name (reserved columns excluded).
    pub fn feature(&self, name: &str) -> Option<&Value> {
        self.features
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Any column by name, reserved columns included.
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            IDS_COLUMN => Some(Value::Text(self.observation_id.clone())),
            LABEL_COLUMN => Some(Value::Text(self.model_label.clone())),
            YHAT_COLUMN => Some(Value::Number(self.predicted)),
            Y_COLUMN => Some(self.actual.map_or(Value::Null, Value::Number)),
            _ => self.feature(name).cloned(),
        }
    }

    /// Column names: features in input order, then the reserved columns.
    pub fn columns(&self) -> Vec<String> {
        self.features
            .iter()
            .map(|(n, _)| n.clone())
            .chain(
                [YHAT_COLUMN, LABEL_COLUMN, IDS_COLUMN, Y_COLUMN]
                    .iter()
                    .map(|s| (*s).to_string()),
            )
            .collect()
    }

    /// Convert an observation row of the JSON export format.
    pub fn from_json_row(row: &Map<String, JsonValue>) -> Result<Self> {
        let actual = match row.get(Y_COLUMN) {
            None | Some(JsonValue::Null) => None,
            Some(v) => Some(v.as_f64().ok_or_else(|| {
                PlotError::Configuration(format!("column {Y_COLUMN} must be a number or null"))
            })?),
        };
        let features = row
            .iter()
            .filter(|(k, _)| {
                !matches!(
                    k.as_str(),
                    IDS_COLUMN | LABEL_COLUMN | VNAME_COLUMN | YHAT_COLUMN | Y_COLUMN
                )
            })
            .map(|(k, v)| (k.clone(), Value::from_json(v)))
            .collect();
        Ok(Self {
            observation_id: required_text(row, IDS_COLUMN)?,
            model_label: required_text(row, LABEL_COLUMN)?,
            predicted: required_number(row, YHAT_COLUMN)?,
            actual,
            features,
        })
    }
}

fn required_text(row: &Map<String, JsonValue>, column: &str) -> Result<String> {
    match row.get(column) {
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(v @ (JsonValue::Number(_) | JsonValue::Bool(_))) => Ok(v.to_string()),
        _ => Err(PlotError::Configuration(format!(
            "row is missing column {column}"
        ))),
    }
}

fn required_number(row: &Map<String, JsonValue>, column: &str) -> Result<f64> {
    row.get(column)
        .and_then(JsonValue::as_f64)
        .ok_or_else(|| PlotError::Configuration(format!("column {column} must be a number")))
}

/// Parse a JSON array of profile rows.
pub fn profiles_from_json(doc: &JsonValue) -> Result<Vec<ProfilePoint>> {
    rows(doc, "profiles")?
        .into_iter()
        .map(ProfilePoint::from_json_row)
        .collect()
}

/// Parse a JSON array of observation rows.
pub fn observations_from_json(doc: &JsonValue) -> Result<Vec<Observation>> {
    rows(doc, "observations")?
        .into_iter()
        .map(Observation::from_json_row)
        .collect()
}

fn rows<'a>(doc: &'a JsonValue, what: &str) -> Result<Vec<&'a Map<String, JsonValue>>> {
    let JsonValue::Array(items) = doc else {
        return Err(PlotError::Configuration(format!("{what} must be a JSON array")));
    };
    items
        .iter()
        .map(|item| {
            item.as_object().ok_or_else(|| {
                PlotError::Configuration(format!("{what} rows must be JSON objects"))
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// Both input tables plus the join index.
#[derive(Debug, Clone)]
pub struct Dataset {
    profiles: Vec<ProfilePoint>,
    observations: Vec<Observation>,
    /// Join key -> row in `observations`; first row wins.
    index: FxHashMap<JoinKey, usize>,
    /// Distinct observation rows in input order.
    unique: Vec<usize>,
    models: Vec<String>,
    targets: Vec<HighlightTarget>,
    tags: FxHashMap<HighlightTarget, EntityTag>,
}

impl Dataset {
    /// Index the tables and check that every profile joins an observation.
    pub fn new(profiles: Vec<ProfilePoint>, observations: Vec<Observation>) -> Result<Self> {
        let mut index = FxHashMap::default();
        let mut unique = Vec::new();
        for (i, obs) in observations.iter().enumerate() {
            let key = obs.join_key();
            if index.contains_key(&key) {
                tracing::warn!(key = %key, "duplicate observation row ignored");
                continue;
            }
            index.insert(key, i);
            unique.push(i);
        }

        if let Some(orphan) = profiles.iter().find(|p| {
            !index.contains_key(&JoinKey::new(
                p.observation_id.as_str(),
                p.model_label.as_str(),
            ))
        }) {
            return Err(PlotError::JoinInconsistency {
                key: orphan.join_key(),
            });
        }

        let mut models: Vec<String> = Vec::new();
        for label in observations
            .iter()
            .map(|o| &o.model_label)
            .chain(profiles.iter().map(|p| &p.model_label))
        {
            if !models.contains(label) {
                models.push(label.clone());
            }
        }

        let targets: Vec<HighlightTarget> = unique
            .iter()
            .map(|&i| HighlightTarget::Entity(observations[i].join_key()))
            .chain(models.iter().cloned().map(HighlightTarget::Model))
            .collect();
        let tags = targets
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), EntityTag(i as u32)))
            .collect();

        Ok(Self {
            profiles,
            observations,
            index,
            unique,
            models,
            targets,
            tags,
        })
    }

    pub fn profiles(&self) -> &[ProfilePoint] {
        &self.profiles
    }

    /// Every observation row, duplicates included, in input order.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// One observation per join key, in input order.
    pub fn unique_observations(&self) -> impl Iterator<Item = &Observation> + '_ {
        self.unique.iter().map(|&i| &self.observations[i])
    }

    pub fn observation(&self, key: &JoinKey) -> Option<&Observation> {
        self.index.get(key).map(|&i| &self.observations[i])
    }

    /// Observation for a profile point. Total after construction.
    pub fn observation_for(&self, point: &ProfilePoint) -> Option<&Observation> {
        self.observation(&point.join_key())
    }

    /// Model labels in first-seen order.
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Profile points of `variable`, in input order.
    pub fn profiles_for<'a>(&'a self, variable: &'a str) -> impl Iterator<Item = &'a ProfilePoint> + 'a {
        self.profiles.iter().filter(move |p| p.variable == variable)
    }

    pub fn tag(&self, target: &HighlightTarget) -> Option<EntityTag> {
        self.tags.get(target).copied()
    }

    pub fn tag_for_key(&self, key: &JoinKey) -> Option<EntityTag> {
        self.tag(&HighlightTarget::Entity(key.clone()))
    }

    pub fn tag_for_model(&self, label: &str) -> Option<EntityTag> {
        self.tag(&HighlightTarget::Model(label.to_string()))
    }

    pub fn target(&self, tag: EntityTag) -> Option<&HighlightTarget> {
        self.targets.get(tag.0 as usize)
    }

    /// Whether `name` is a column of the observations (reserved included).
    pub fn has_column(&self, name: &str) -> bool {
        self.observations
            .first()
            .is_some_and(|o| o.field(name).is_some())
    }

    /// `[min, max]` over every profile prediction and every actual outcome.
    pub fn outcome_extent(&self) -> Option<(f64, f64)> {
        self.profiles
            .iter()
            .map(|p| p.predicted)
            .chain(self.observations.iter().filter_map(|o| o.actual))
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Decimal places of the first observation's actual outcome.
    pub fn outcome_decimals(&self) -> usize {
        self.observations
            .first()
            .and_then(|o| o.actual)
            .map_or(0, decimal_places)
    }
}

/// Number of digits after the decimal point in the shortest form of `v`.
pub fn decimal_places(v: f64) -> usize {
    let s = v.to_string();
    s.split_once('.').map_or(0, |(_, frac)| frac.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obs(id: &str, label: &str, yhat: f64, y: Option<f64>) -> Observation {
        Observation::new(id, label, yhat, y).with_feature("x", 1.0)
    }

    #[test]
    fn value_kinds_and_display() {
        assert_eq!(Value::from(3.0).to_string(), "3");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from("low").to_string(), "low");
        assert!(Value::Null.is_empty());
        assert!(Value::from("").is_empty());
        assert!(!Value::from(0.0).is_empty());
        assert_eq!(Value::Bool(true).kind_name(), "boolean");
    }

    #[test]
    fn value_deserializes_untagged() {
        let v: Vec<Value> = serde_json::from_value(json!([null, true, 4, 1.5, "a"])).unwrap();
        assert_eq!(
            v,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::Number(4.0),
                Value::Number(1.5),
                Value::Text("a".into()),
            ]
        );
    }

    #[test]
    fn join_key_equality_is_structural() {
        let a = JoinKey::new("1|a", "b");
        let b = JoinKey::new("1", "a|b");
        assert_ne!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn profile_from_json_row() {
        let row = json!({"_ids_": 7, "_label_": "gbm", "_vname_": "age", "_yhat_": 0.4, "age": 31, "sex": "m"});
        let p = ProfilePoint::from_json_row(row.as_object().unwrap()).unwrap();
        assert_eq!(p, ProfilePoint::new("7", "gbm", "age", 31.0, 0.4));
    }

    #[test]
    fn observation_from_json_row_keeps_feature_order() {
        let row = json!({"b": 1, "a": "x", "_yhat_": 2.0, "_label_": "lm", "_ids_": "3", "_y_": null});
        let o = Observation::from_json_row(row.as_object().unwrap()).unwrap();
        assert_eq!(o.actual, None);
        assert_eq!(
            o.columns(),
            vec!["b", "a", "_yhat_", "_label_", "_ids_", "_y_"]
        );
        assert_eq!(o.field("_label_"), Some(Value::from("lm")));
        assert_eq!(o.field("_y_"), Some(Value::Null));
        assert_eq!(o.field("missing"), None);
    }

    #[test]
    fn missing_reserved_column_is_configuration_error() {
        let row = json!({"_label_": "lm", "_yhat_": 1.0});
        let err = Observation::from_json_row(row.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, PlotError::Configuration(_)));
    }

    #[test]
    fn dataset_rejects_orphan_profiles() {
        let err = Dataset::new(
            vec![ProfilePoint::new("9", "lm", "x", 1.0, 1.0)],
            vec![obs("1", "lm", 1.0, None)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            PlotError::JoinInconsistency {
                key: JoinKey::new("9", "lm")
            }
        );
    }

    #[test]
    fn duplicate_observations_first_wins() {
        let ds = Dataset::new(
            vec![],
            vec![obs("1", "lm", 1.0, None), obs("1", "lm", 5.0, None)],
        )
        .unwrap();
        assert_eq!(ds.unique_observations().count(), 1);
        assert_eq!(ds.observations().len(), 2);
        assert_eq!(
            ds.observation(&JoinKey::new("1", "lm")).map(|o| o.predicted),
            Some(1.0)
        );
    }

    #[test]
    fn tags_cover_entities_then_models() {
        let ds = Dataset::new(
            vec![],
            vec![obs("1", "lm", 1.0, None), obs("1", "rf", 1.0, None)],
        )
        .unwrap();
        assert_eq!(ds.tag_for_key(&JoinKey::new("1", "lm")), Some(EntityTag(0)));
        assert_eq!(ds.tag_for_key(&JoinKey::new("1", "rf")), Some(EntityTag(1)));
        assert_eq!(ds.tag_for_model("lm"), Some(EntityTag(2)));
        assert_eq!(
            ds.target(EntityTag(3)),
            Some(&HighlightTarget::Model("rf".into()))
        );
    }

    #[test]
    fn outcome_extent_unions_profiles_and_actuals() {
        let ds = Dataset::new(
            vec![
                ProfilePoint::new("1", "lm", "x", 0.0, 2.0),
                ProfilePoint::new("1", "lm", "x", 1.0, 3.0),
            ],
            vec![obs("1", "lm", 2.5, Some(7.0))],
        )
        .unwrap();
        assert_eq!(ds.outcome_extent(), Some((2.0, 7.0)));
    }

    #[test]
    fn decimal_places_of_shortest_form() {
        assert_eq!(decimal_places(3.0), 0);
        assert_eq!(decimal_places(0.25), 2);
        assert_eq!(decimal_places(2.8), 1);
    }
}
