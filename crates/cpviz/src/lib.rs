#![forbid(unsafe_code)]

//! Layered ceteris paribus profile plots.
//!
//! One cell per variable; in every cell up to five layers share a common
//! outcome axis and the cell's variable axis:
//!
//! - individual profiles (one line per observation and model),
//! - observed points at the observation's real input,
//! - rug marks on both axes,
//! - residual segments from prediction to actual outcome,
//! - aggregate (mean or median) profiles per model.
//!
//! Hovering any drawn entity, or a row of the companion table, highlights
//! the same (observation, model) pair across every layer and cell.
//!
//! ```no_run
//! use cpviz::prelude::*;
//!
//! let container = Container::new(800.0, 600.0);
//! let profiles = vec![ProfilePoint::new("1", "lm", "age", 30.0, 0.4)];
//! let observations = vec![Observation::new("1", "lm", 0.4, Some(1.0)).with_feature("age", 30.0)];
//! let mut plot = create_plot(
//!     Some(&container),
//!     profiles,
//!     observations,
//!     &PlotOptions::with_variables(["age"]),
//! )?;
//! plot.resize(1024.0, 768.0);
//! let svg = plot.to_svg();
//! # Ok::<(), cpviz::PlotError>(())
//! ```

pub mod axes;
pub mod data;
pub mod error;
pub mod highlight;
pub mod layers;
pub mod legend;
pub mod options;
pub mod plot;
pub mod resize;
pub mod scale;
pub mod table;
pub mod tooltip;

// --- Re-exports -----------------------------------------------------------

pub use data::{Dataset, JoinKey, Observation, ProfilePoint, Value};
pub use error::{OptionsError, PlotError, Result};
pub use highlight::{HighlightState, HighlightTarget, HoverSource};
pub use layers::{LayerKind, LayerSet, NodeKind};
pub use legend::{Legend, LegendEntry};
pub use options::{Aggregate, LayerStyle, PlotOptions, ResolvedOptions};
pub use plot::{Plot, create_plot};
pub use resize::{RESIZE_THRESHOLD, ResizeController, ResizeDecision};
pub use scale::{ColorMode, ColorScale, LinearScale, PointScale, ScaleManager, VariableKind};
pub use table::{TableEvent, TableModel, TableRow};
pub use tooltip::Tooltip;

pub use cpviz_core::event::{PointerEvent, PointerKind};
pub use cpviz_core::geometry::{Point, Rect, Sides, Size};
pub use cpviz_core::viewport::{Container, Subscription, ViewportSignal};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Container, HighlightTarget, HoverSource, JoinKey, Observation, Plot, PlotError,
        PlotOptions, PointerEvent, ProfilePoint, Result, TableEvent, Value, create_plot,
    };
}
