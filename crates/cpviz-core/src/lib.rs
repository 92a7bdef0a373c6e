#![forbid(unsafe_code)]

//! Core primitives shared by every cpviz crate: floating-point geometry,
//! pointer events, and the host viewport signal.

pub mod event;
pub mod geometry;
pub mod viewport;
