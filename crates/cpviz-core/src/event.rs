#![forbid(unsafe_code)]

//! Pointer events delivered by the host.

use crate::geometry::Point;

/// Kind of pointer activity over the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// The pointer moved to a new position inside the surface.
    Moved,
    /// The pointer left the surface entirely.
    Left,
}

/// A pointer event in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
}

impl PointerEvent {
    /// Pointer moved to `(x, y)`.
    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::Moved,
            position: Point::new(x, y),
        }
    }

    /// Pointer left the surface.
    #[must_use]
    pub const fn left() -> Self {
        Self {
            kind: PointerKind::Left,
            position: Point::new(f64::NAN, f64::NAN),
        }
    }
}

/// Enter/leave phase of a hover interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoverPhase {
    Enter,
    Leave,
}
