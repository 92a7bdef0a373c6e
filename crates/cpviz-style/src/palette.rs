#![forbid(unsafe_code)]

//! Categorical and sequential chart palettes.

use cpviz_render::Rgba;

/// Twelve-color qualitative palette ("Paired").
pub const PAIRED: [Rgba; 12] = [
    Rgba::from_hex(0xa6cee3),
    Rgba::from_hex(0x1f78b4),
    Rgba::from_hex(0xb2df8a),
    Rgba::from_hex(0x33a02c),
    Rgba::from_hex(0xfb9a99),
    Rgba::from_hex(0xe31a1c),
    Rgba::from_hex(0xfdbf6f),
    Rgba::from_hex(0xff7f00),
    Rgba::from_hex(0xcab2d6),
    Rgba::from_hex(0x6a3d9a),
    Rgba::from_hex(0xffff99),
    Rgba::from_hex(0xb15928),
];

const OR_RD_3: [u32; 3] = [0xfee8c8, 0xfdbb84, 0xe34a33];
const OR_RD_4: [u32; 4] = [0xfef0d9, 0xfdcc8a, 0xfc8d59, 0xd7301f];
const OR_RD_5: [u32; 5] = [0xfef0d9, 0xfdcc8a, 0xfc8d59, 0xe34a33, 0xb30000];
const OR_RD_6: [u32; 6] = [0xfef0d9, 0xfdd49e, 0xfdbb84, 0xfc8d59, 0xe34a33, 0xb30000];
const OR_RD_7: [u32; 7] = [
    0xfef0d9, 0xfdd49e, 0xfdbb84, 0xfc8d59, 0xef6548, 0xd7301f, 0x990000,
];
const OR_RD_8: [u32; 8] = [
    0xfff7ec, 0xfee8c8, 0xfdd49e, 0xfdbb84, 0xfc8d59, 0xef6548, 0xd7301f, 0x990000,
];
const OR_RD_9: [u32; 9] = [
    0xfff7ec, 0xfee8c8, 0xfdd49e, 0xfdbb84, 0xfc8d59, 0xef6548, 0xd7301f, 0xb30000, 0x7f0000,
];

/// Sequential orange-red palette with `classes` colors, light to dark.
///
/// `classes` is clamped to `3..=9`.
pub fn or_rd(classes: usize) -> Vec<Rgba> {
    let hex: &[u32] = match classes.clamp(3, 9) {
        3 => &OR_RD_3,
        4 => &OR_RD_4,
        5 => &OR_RD_5,
        6 => &OR_RD_6,
        7 => &OR_RD_7,
        8 => &OR_RD_8,
        _ => &OR_RD_9,
    };
    hex.iter().copied().map(Rgba::from_hex).collect()
}

/// Color at `index`, cycling through `palette`.
pub fn cycle(palette: &[Rgba], index: usize) -> Option<Rgba> {
    if palette.is_empty() {
        None
    } else {
        Some(palette[index % palette.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn or_rd_sizes_clamped() {
        assert_eq!(or_rd(0).len(), 3);
        assert_eq!(or_rd(5).len(), 5);
        assert_eq!(or_rd(42).len(), 9);
        assert_eq!(or_rd(3)[2], Rgba::from_hex(0xe34a33));
    }

    #[test]
    fn cycle_wraps() {
        assert_eq!(cycle(&PAIRED, 12), Some(PAIRED[0]));
        assert_eq!(cycle(&PAIRED, 13), Some(PAIRED[1]));
        assert_eq!(cycle(&[], 0), None);
    }
}
