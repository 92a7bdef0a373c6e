#![forbid(unsafe_code)]

//! Color parsing and palettes for cpviz charts.

pub mod color;
pub mod palette;

pub use color::{ColorParseError, parse_color};
pub use palette::{PAIRED, cycle, or_rd};
