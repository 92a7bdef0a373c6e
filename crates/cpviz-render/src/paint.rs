#![forbid(unsafe_code)]

//! Visual style of a scene node.

use crate::color::Rgba;

/// Stroke, fill, opacity and visibility of one node.
///
/// Every node carries two paints: the base paint assigned when it was
/// drawn and the current paint. Interaction restyles only the current one,
/// so restoring a node is always `current = base`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub stroke: Option<Rgba>,
    pub fill: Option<Rgba>,
    pub stroke_width: f64,
    /// Whole-node opacity in `[0, 1]`.
    pub opacity: f64,
    /// Opacity applied to the stroke only.
    pub stroke_opacity: f64,
    /// Hidden nodes are not rendered and not hit-testable.
    pub visible: bool,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            stroke: None,
            fill: None,
            stroke_width: 1.0,
            opacity: 1.0,
            stroke_opacity: 1.0,
            visible: true,
        }
    }
}

impl Paint {
    /// A stroked, unfilled paint.
    #[must_use]
    pub fn stroked(color: Rgba, width: f64) -> Self {
        Self {
            stroke: Some(color),
            stroke_width: width,
            ..Self::default()
        }
    }

    /// A filled paint with a stroke of the same color.
    #[must_use]
    pub fn filled(color: Rgba) -> Self {
        Self {
            stroke: Some(color),
            fill: Some(color),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_fill(mut self, fill: Rgba) -> Self {
        self.fill = Some(fill);
        self
    }

    #[must_use]
    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn with_stroke_opacity(mut self, opacity: f64) -> Self {
        self.stroke_opacity = opacity.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_compose() {
        let p = Paint::stroked(Rgba::BLACK, 2.5)
            .with_opacity(0.4)
            .with_stroke_opacity(0.2);
        assert_eq!(p.stroke, Some(Rgba::BLACK));
        assert_eq!(p.fill, None);
        assert_eq!(p.stroke_width, 2.5);
        assert_eq!(p.opacity, 0.4);
        assert_eq!(p.stroke_opacity, 0.2);
        assert!(p.visible);
        assert!(!p.hidden().visible);
    }

    #[test]
    fn opacity_is_clamped() {
        assert_eq!(Paint::default().with_opacity(3.0).opacity, 1.0);
        assert_eq!(Paint::default().with_opacity(-3.0).opacity, 0.0);
    }
}
