#![forbid(unsafe_code)]

//! Packed RGBA color.

use std::fmt;

/// A 32-bit color packed as `0xRRGGBBAA`, straight alpha.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Rgba(pub u32);

impl Rgba {
    /// Fully transparent (alpha = 0).
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create an opaque RGB color (alpha = 255).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create an RGBA color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    /// Build from a `0xRRGGBB` literal, opaque.
    #[inline]
    pub const fn from_hex(hex: u32) -> Self {
        Self((hex << 8) | 0xff)
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Scale alpha by `opacity` in `[0.0, 1.0]`.
    #[inline]
    #[must_use]
    pub fn with_opacity(self, opacity: f64) -> Self {
        let opacity = opacity.clamp(0.0, 1.0);
        let a = (f64::from(self.a()) * opacity).round().clamp(0.0, 255.0) as u8;
        Self::rgba(self.r(), self.g(), self.b(), a)
    }

    /// `#rrggbb` form, alpha dropped.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())
    }
}

impl fmt::Debug for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rgba(#{:02x}{:02x}{:02x}{:02x})",
            self.r(),
            self.g(),
            self.b(),
            self.a()
        )
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_round_trip() {
        let c = Rgba::rgba(0x19, 0x19, 0x70, 0x80);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (0x19, 0x19, 0x70, 0x80));
    }

    #[test]
    fn from_hex_is_opaque() {
        let c = Rgba::from_hex(0x1f78b4);
        assert_eq!(c, Rgba::rgb(0x1f, 0x78, 0xb4));
        assert_eq!(c.to_hex(), "#1f78b4");
    }

    #[test]
    fn with_opacity_scales_alpha() {
        assert_eq!(Rgba::WHITE.with_opacity(0.5).a(), 128);
        assert_eq!(Rgba::WHITE.with_opacity(2.0).a(), 255);
        assert_eq!(Rgba::WHITE.with_opacity(-1.0).a(), 0);
    }
}
