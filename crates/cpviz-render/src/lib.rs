#![forbid(unsafe_code)]

//! Drawing kernel for cpviz.
//!
//! - [`color::Rgba`]: packed 32-bit color.
//! - [`paint::Paint`]: stroke, fill, width, opacity and visibility of a node.
//! - [`scene::Scene`]: retained tree of groups and shapes. Layers draw into
//!   it once and later update positions or styles in place.
//! - [`hit::HitIndex`]: pointer hit testing over tagged scene nodes.
//! - [`svg::SvgExporter`]: serializes a scene to an SVG document.

pub mod color;
pub mod hit;
pub mod paint;
pub mod scene;
pub mod svg;

pub use color::Rgba;
pub use paint::Paint;
pub use scene::{EntityTag, Node, NodeId, Scene, Shape, TextAnchor};
