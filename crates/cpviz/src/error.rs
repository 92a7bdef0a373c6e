#![forbid(unsafe_code)]

//! Error types.

use crate::data::JoinKey;
use std::fmt;

/// Errors raised while constructing a plot.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotError {
    /// Missing container, missing or empty `variables`, or a malformed option.
    ///
    /// Fatal: construction is aborted.
    Configuration(String),
    /// A plotted variable's values are neither numeric nor textual.
    ///
    /// Local to one cell; the remaining cells are still built.
    TypeMismatch {
        variable: String,
        /// Runtime kind of the first non-empty value (`"boolean"`, …).
        found: &'static str,
    },
    /// A profile references a join key with no observation row.
    ///
    /// Fatal: every layer assumes the join is total.
    JoinInconsistency { key: JoinKey },
}

impl PlotError {
    /// Whether this error aborts the whole plot.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::TypeMismatch { .. })
    }
}

impl fmt::Display for PlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "configuration error: {msg}"),
            Self::TypeMismatch { variable, found } => write!(
                f,
                "unable to identify type of variable {variable}: found {found}, expected a number or a string"
            ),
            Self::JoinInconsistency { key } => {
                write!(f, "profile references unknown observation {key}")
            }
        }
    }
}

impl std::error::Error for PlotError {}

/// Errors in an options payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    /// `aggregate_profiles` was neither "mean", "median" nor falsy.
    UnknownAggregate(String),
    /// A `categorical_order` record without a `variable` name.
    OrderWithoutVariable,
    /// The options document itself did not parse.
    Json(String),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAggregate(s) => {
                write!(f, "aggregate_profiles must be \"mean\" or \"median\", got {s:?}")
            }
            Self::OrderWithoutVariable => {
                write!(f, "categorical_order entry is missing its \"variable\" field")
            }
            Self::Json(msg) => write!(f, "invalid options: {msg}"),
        }
    }
}

impl std::error::Error for OptionsError {}

impl From<OptionsError> for PlotError {
    fn from(err: OptionsError) -> Self {
        Self::Configuration(err.to_string())
    }
}

/// Standard result type for cpviz APIs.
pub type Result<T> = std::result::Result<T, PlotError>;
