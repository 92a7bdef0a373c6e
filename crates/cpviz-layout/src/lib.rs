#![forbid(unsafe_code)]

//! Layout for multi-panel charts.
//!
//! - [`GridLayout`] / [`CellGeometry`]: partition of the plot area into one
//!   cell per variable, with margins and a shared rug band.
//! - [`ChartFrame`]: split of the viewport into chart, legend and table.
//! - [`Typography`]: font sizes per text class with auto-resize and pinning.

pub mod frame;
pub mod grid;
pub mod typography;

pub use cpviz_core::geometry::{Point, Rect, Sides, Size};
pub use frame::ChartFrame;
pub use grid::{CellGeometry, GridLayout};
pub use typography::{FontClass, FontPins, Typography, text_width};
