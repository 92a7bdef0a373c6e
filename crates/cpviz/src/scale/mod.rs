#![forbid(unsafe_code)]

//! Scale construction and ownership.
//!
//! [`ScaleManager`] owns every scale of one plot: the shared outcome axis,
//! one horizontal scale per variable, and the color encoding. Domains are
//! fixed at construction; [`ScaleManager::rescale`] only replaces ranges and
//! is called exclusively from the resize path.

pub mod color;
pub mod linear;
pub mod point;
pub mod ticks;

pub use color::{ColorMode, ColorScale, ConstantColor, OrdinalColor, QuantizedColor};
pub use linear::LinearScale;
pub use point::PointScale;

use crate::data::{Dataset, Observation, ProfilePoint, Value};
use crate::error::{PlotError, Result};
use cpviz_layout::CellGeometry;
use cpviz_render::Rgba;
use rustc_hash::FxHashMap;

/// Kind of a plotted variable, decided once from its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Numeric,
    Categorical,
}

impl VariableKind {
    /// Classify from the first non-empty value.
    pub fn detect<'a>(
        variable: &str,
        values: impl IntoIterator<Item = &'a Value>,
    ) -> Result<Self> {
        let first = values.into_iter().find(|v| !v.is_empty());
        match first {
            Some(Value::Number(_)) => Ok(Self::Numeric),
            Some(Value::Text(_)) => Ok(Self::Categorical),
            Some(other) => Err(PlotError::TypeMismatch {
                variable: variable.to_string(),
                found: other.kind_name(),
            }),
            None => Err(PlotError::TypeMismatch {
                variable: variable.to_string(),
                found: "no values",
            }),
        }
    }
}

/// Horizontal scale of one variable.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableScale {
    Linear(LinearScale),
    Point(PointScale),
}

impl VariableScale {
    pub fn kind(&self) -> VariableKind {
        match self {
            Self::Linear(_) => VariableKind::Numeric,
            Self::Point(_) => VariableKind::Categorical,
        }
    }

    /// Pixel position of `value`; `None` if it does not fit this scale.
    pub fn apply(&self, value: &Value) -> Option<f64> {
        match (self, value) {
            (Self::Linear(s), Value::Number(n)) if n.is_finite() => Some(s.apply(*n)),
            (Self::Point(s), Value::Text(t)) => s.apply(t),
            (Self::Point(s), Value::Number(n)) => s.apply(&n.to_string()),
            _ => None,
        }
    }

    /// Sort key along the axis: numeric value or category ordinal.
    pub fn order_key(&self, value: &Value) -> Option<f64> {
        match (self, value) {
            (Self::Linear(_), Value::Number(n)) if n.is_finite() => Some(*n),
            (Self::Point(s), v) => s.ordinal(&v.to_string()).map(|i| i as f64),
            _ => None,
        }
    }

    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.range(),
            Self::Point(s) => s.range(),
        }
    }

    fn set_range_for(&mut self, geometry: &CellGeometry) {
        match self {
            Self::Linear(s) => s.set_range(geometry.x_range()),
            Self::Point(s) => s.set_range(geometry.point_range()),
        }
    }
}

/// All scales of one plot.
#[derive(Debug)]
pub struct ScaleManager {
    outcome: LinearScale,
    variables: FxHashMap<String, VariableScale>,
    color: Box<dyn ColorScale>,
}

impl ScaleManager {
    /// Build every scale. Variables whose kind cannot be determined are
    /// left out and reported in the returned error list.
    pub fn build(
        dataset: &Dataset,
        variables: &[String],
        categorical_order: &FxHashMap<String, Vec<String>>,
        color_variable: Option<&str>,
        bucket_count: usize,
        default_color: Rgba,
        geometry: &CellGeometry,
    ) -> (Self, Vec<PlotError>) {
        let mut scales = FxHashMap::default();
        let mut errors = Vec::new();
        for variable in variables {
            let points: Vec<&ProfilePoint> = dataset.profiles_for(variable).collect();
            let hint = categorical_order.get(variable).map(Vec::as_slice);
            match Self::build_variable_scale(variable, &points, hint, geometry) {
                Ok(scale) => {
                    scales.insert(variable.clone(), scale);
                }
                Err(err) => {
                    tracing::warn!(variable = %variable, error = %err, "cell skipped");
                    errors.push(err);
                }
            }
        }
        let manager = Self {
            outcome: Self::build_outcome_scale(dataset, geometry),
            variables: scales,
            color: Self::build_color_scale(
                color_variable,
                dataset.unique_observations(),
                bucket_count,
                default_color,
            ),
        };
        (manager, errors)
    }

    /// Outcome axis over the union of predictions and actual outcomes,
    /// inverted so larger outcomes sit higher.
    pub fn build_outcome_scale(dataset: &Dataset, geometry: &CellGeometry) -> LinearScale {
        let domain = dataset.outcome_extent().unwrap_or((0.0, 0.0));
        LinearScale::new(domain, geometry.y_range())
    }

    /// Horizontal scale for `variable` from its profile points.
    pub fn build_variable_scale(
        variable: &str,
        points: &[&ProfilePoint],
        order_hint: Option<&[String]>,
        geometry: &CellGeometry,
    ) -> Result<VariableScale> {
        match VariableKind::detect(variable, points.iter().map(|p| &p.value))? {
            VariableKind::Numeric => {
                let (lo, hi) = points
                    .iter()
                    .filter_map(|p| p.value.as_f64())
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                        (lo.min(v), hi.max(v))
                    });
                let domain = if lo <= hi { (lo, hi) } else { (0.0, 0.0) };
                Ok(VariableScale::Linear(LinearScale::new(
                    domain,
                    geometry.x_range(),
                )))
            }
            VariableKind::Categorical => {
                let domain = match order_hint {
                    Some(order) => order.to_vec(),
                    None => {
                        let mut seen: Vec<String> = Vec::new();
                        for p in points {
                            if p.value.is_empty() {
                                continue;
                            }
                            let c = p.value.to_string();
                            if !seen.contains(&c) {
                                seen.push(c);
                            }
                        }
                        seen
                    }
                };
                Ok(VariableScale::Point(PointScale::new(
                    domain,
                    geometry.point_range(),
                )))
            }
        }
    }

    /// Color encoding for `color_variable` over the observations.
    ///
    /// `None`, or a name that is not an observation column, yields a
    /// constant scale.
    pub fn build_color_scale<'a>(
        color_variable: Option<&str>,
        observations: impl Iterator<Item = &'a Observation>,
        bucket_count: usize,
        default_color: Rgba,
    ) -> Box<dyn ColorScale> {
        let Some(name) = color_variable else {
            return Box::new(ConstantColor::new(default_color));
        };
        let values: Vec<Value> = observations.filter_map(|o| o.field(name)).collect();
        if values.is_empty() {
            return Box::new(ConstantColor::new(default_color));
        }
        match values.iter().find(|v| !v.is_empty()) {
            Some(Value::Number(_)) => {
                let (lo, hi) = values
                    .iter()
                    .filter_map(Value::as_f64)
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                        (lo.min(v), hi.max(v))
                    });
                let (lo, hi) = if lo <= hi { (lo, hi) } else { (0.0, 0.0) };
                Box::new(QuantizedColor::new(lo, hi, bucket_count, default_color))
            }
            _ => Box::new(OrdinalColor::new(&values, default_color)),
        }
    }

    /// Replace every range after a geometry change. Domains are untouched.
    pub fn rescale(&mut self, geometry: &CellGeometry) {
        self.outcome.set_range(geometry.y_range());
        for scale in self.variables.values_mut() {
            scale.set_range_for(geometry);
        }
    }

    pub fn outcome(&self) -> &LinearScale {
        &self.outcome
    }

    pub fn variable(&self, name: &str) -> Option<&VariableScale> {
        self.variables.get(name)
    }

    pub fn color(&self) -> &dyn ColorScale {
        self.color.as_ref()
    }
}
