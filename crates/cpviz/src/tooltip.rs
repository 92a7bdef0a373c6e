#![forbid(unsafe_code)]

//! Tooltip content for hovered nodes.

use crate::data::{Dataset, Value};
use crate::layers::Datum;
use cpviz_core::geometry::Point;
use std::fmt::Write as _;

/// A tooltip ready for the host to display.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub title: &'static str,
    /// `(label, value)` lines under the title.
    pub lines: Vec<(String, String)>,
    /// Pointer position the tooltip belongs to, in chart coordinates.
    pub anchor: Point,
    pub font_size: f64,
}

impl Tooltip {
    /// Content for `datum` in the cell of `variable`. Predictions are
    /// printed with `decimals` fraction digits.
    pub fn for_datum(
        datum: &Datum,
        variable: &str,
        dataset: &Dataset,
        decimals: usize,
    ) -> Option<Self> {
        let pred = |v: f64| format!("{v:.decimals$}");
        let (title, lines) = match datum {
            Datum::ProfileLine { key } => (
                "ICE line",
                vec![
                    line("obs. id", &key.observation_id),
                    line("model", &key.model_label),
                ],
            ),
            Datum::ProfilePoint {
                key,
                value,
                predicted,
            } => (
                "ICE line",
                vec![
                    line("obs. id", &key.observation_id),
                    line("model", &key.model_label),
                    line("y_pred", pred(*predicted)),
                    line(variable, value),
                ],
            ),
            Datum::Observed { key } => {
                let obs = dataset.observation(key)?;
                (
                    "Predicted point",
                    vec![
                        line("obs. id", &obs.observation_id),
                        line("model", &obs.model_label),
                        line("y_pred", pred(obs.predicted)),
                        line(variable, feature(obs.feature(variable))),
                    ],
                )
            }
            Datum::Residual { key } => {
                let obs = dataset.observation(key)?;
                let actual = obs.actual?;
                (
                    "Data point",
                    vec![
                        line("obs. id", &obs.observation_id),
                        line("y", actual),
                        line("y_pred", pred(obs.predicted)),
                        line("residual", pred(actual - obs.predicted)),
                        line(variable, feature(obs.feature(variable))),
                    ],
                )
            }
            Datum::AggregateLine { model } => ("PDP line", vec![line("model", model)]),
            Datum::AggregatePoint {
                model,
                value,
                predicted,
            } => (
                "PDP line",
                vec![
                    line("model", model),
                    line("y_pred", pred(*predicted)),
                    line(variable, value),
                ],
            ),
        };
        Some(Self {
            title,
            lines,
            anchor: Point::default(),
            font_size: 0.0,
        })
    }

    #[must_use]
    pub fn at(mut self, anchor: Point, font_size: f64) -> Self {
        self.anchor = anchor;
        self.font_size = font_size;
        self
    }

    /// Plain-text rendering: the title, then one `label: value` per line.
    pub fn text(&self) -> String {
        let mut out = String::from(self.title);
        for (label, value) in &self.lines {
            let _ = write!(out, "\n{label}: {value}");
        }
        out
    }
}

fn line(label: &str, value: impl ToString) -> (String, String) {
    (label.to_string(), value.to_string())
}

fn feature(value: Option<&Value>) -> String {
    value.map(Value::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{JoinKey, Observation};

    fn dataset() -> Dataset {
        Dataset::new(
            Vec::new(),
            vec![Observation::new("3", "rf", 1.2, Some(2.5)).with_feature("x", 4.0)],
        )
        .unwrap()
    }

    #[test]
    fn residual_tooltip() {
        let d = dataset();
        let datum = Datum::Residual {
            key: JoinKey::new("3", "rf"),
        };
        let t = Tooltip::for_datum(&datum, "x", &d, 1).unwrap();
        assert_eq!(
            t.text(),
            "Data point\nobs. id: 3\ny: 2.5\ny_pred: 1.2\nresidual: 1.3\nx: 4"
        );
    }

    #[test]
    fn profile_point_tooltip() {
        let d = dataset();
        let datum = Datum::ProfilePoint {
            key: JoinKey::new("3", "rf"),
            value: Value::from(0.5),
            predicted: 2.0,
        };
        let t = Tooltip::for_datum(&datum, "x", &d, 2).unwrap();
        assert_eq!(t.title, "ICE line");
        assert_eq!(t.lines[2], ("y_pred".into(), "2.00".into()));
        assert_eq!(t.lines[3], ("x".into(), "0.5".into()));
    }

    #[test]
    fn aggregate_tooltip() {
        let d = dataset();
        let datum = Datum::AggregatePoint {
            model: "rf".into(),
            value: Value::from("a"),
            predicted: 3.0,
        };
        let t = Tooltip::for_datum(&datum, "g", &d, 0).unwrap();
        assert_eq!(t.text(), "PDP line\nmodel: rf\ny_pred: 3\ng: a");
    }

    #[test]
    fn residual_without_outcome_has_no_tooltip() {
        let d = Dataset::new(Vec::new(), vec![Observation::new("1", "lm", 1.0, None)]).unwrap();
        let datum = Datum::Residual {
            key: JoinKey::new("1", "lm"),
        };
        assert_eq!(Tooltip::for_datum(&datum, "x", &d, 0), None);
    }
}
