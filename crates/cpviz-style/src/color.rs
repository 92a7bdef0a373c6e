#![forbid(unsafe_code)]

//! CSS color strings.
//!
//! Accepts `#rgb`, `#rrggbb` and CSS named colors (case-insensitive).

use cpviz_render::Rgba;
use std::fmt;

/// Error returned by [`parse_color`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// The string was empty or whitespace.
    Empty,
    /// `#` followed by something other than 3 or 6 hex digits.
    InvalidHex(String),
    /// Not a known color name.
    UnknownName(String),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty color string"),
            Self::InvalidHex(s) => write!(f, "invalid hex color: #{s}"),
            Self::UnknownName(s) => write!(f, "unknown color name: {s}"),
        }
    }
}

impl std::error::Error for ColorParseError {}

/// Parse a CSS color string (hex or named).
pub fn parse_color(s: &str) -> Result<Rgba, ColorParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorParseError::Empty);
    }
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| ColorParseError::InvalidHex(hex.to_string()));
    }
    let lower = s.to_ascii_lowercase();
    NAMED
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, hex)| Rgba::from_hex(*hex))
        .ok_or_else(|| ColorParseError::UnknownName(s.to_string()))
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Rgba::rgb(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Rgba::rgb(r, g, b))
        }
        _ => None,
    }
}

const NAMED: &[(&str, u32)] = &[
    ("black", 0x000000),
    ("white", 0xffffff),
    ("red", 0xff0000),
    ("green", 0x008000),
    ("blue", 0x0000ff),
    ("yellow", 0xffff00),
    ("cyan", 0x00ffff),
    ("aqua", 0x00ffff),
    ("magenta", 0xff00ff),
    ("fuchsia", 0xff00ff),
    ("orange", 0xffa500),
    ("purple", 0x800080),
    ("pink", 0xffc0cb),
    ("brown", 0xa52a2a),
    ("gray", 0x808080),
    ("grey", 0x808080),
    ("lightgray", 0xd3d3d3),
    ("lightgrey", 0xd3d3d3),
    ("darkgray", 0xa9a9a9),
    ("darkgrey", 0xa9a9a9),
    ("lime", 0x00ff00),
    ("navy", 0x000080),
    ("teal", 0x008080),
    ("maroon", 0x800000),
    ("olive", 0x808000),
    ("silver", 0xc0c0c0),
    ("gold", 0xffd700),
    ("coral", 0xff7f50),
    ("crimson", 0xdc143c),
    ("darkred", 0x8b0000),
    ("darkblue", 0x00008b),
    ("darkgreen", 0x006400),
    ("darkorange", 0xff8c00),
    ("forestgreen", 0x228b22),
    ("indigo", 0x4b0082),
    ("midnightblue", 0x191970),
    ("orchid", 0xda70d6),
    ("royalblue", 0x4169e1),
    ("salmon", 0xfa8072),
    ("seagreen", 0x2e8b57),
    ("skyblue", 0x87ceeb),
    ("slategray", 0x708090),
    ("steelblue", 0x4682b4),
    ("tomato", 0xff6347),
    ("turquoise", 0x40e0d0),
    ("violet", 0xee82ee),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors_case_insensitive() {
        assert_eq!(parse_color("MidnightBlue"), Ok(Rgba::from_hex(0x191970)));
        assert_eq!(parse_color(" red "), Ok(Rgba::rgb(255, 0, 0)));
    }

    #[test]
    fn hex_forms() {
        assert_eq!(parse_color("#fff"), Ok(Rgba::WHITE));
        assert_eq!(parse_color("#1f78b4"), Ok(Rgba::rgb(0x1f, 0x78, 0xb4)));
        assert_eq!(
            parse_color("#12345"),
            Err(ColorParseError::InvalidHex("12345".to_string()))
        );
        assert!(parse_color("#gggggg").is_err());
    }

    #[test]
    fn unknown_and_empty() {
        assert_eq!(
            parse_color("blurple"),
            Err(ColorParseError::UnknownName("blurple".to_string()))
        );
        assert_eq!(parse_color("   "), Err(ColorParseError::Empty));
    }

    #[test]
    fn error_display() {
        assert_eq!(
            ColorParseError::UnknownName("x".into()).to_string(),
            "unknown color name: x"
        );
    }
}
