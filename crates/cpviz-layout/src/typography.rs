#![forbid(unsafe_code)]

//! Font sizes per text class.
//!
//! Unpinned sizes follow a step function of the cell width minus a fixed
//! per-class adjustment. A size set explicitly by configuration is pinned
//! and never auto-adjusted.

use unicode_width::UnicodeWidthStr;

/// Text classes with independently sized fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontClass {
    Titles,
    Legend,
    Axes,
    Tooltips,
    Table,
}

impl FontClass {
    pub const ALL: [FontClass; 5] = [
        FontClass::Titles,
        FontClass::Legend,
        FontClass::Axes,
        FontClass::Tooltips,
        FontClass::Table,
    ];

    const fn index(self) -> usize {
        match self {
            FontClass::Titles => 0,
            FontClass::Legend => 1,
            FontClass::Axes => 2,
            FontClass::Tooltips => 3,
            FontClass::Table => 4,
        }
    }

    /// Points subtracted from the stepped base size.
    pub const fn adjustment(self) -> f64 {
        match self {
            FontClass::Titles | FontClass::Legend => 0.0,
            FontClass::Axes => 4.0,
            FontClass::Tooltips => 1.0,
            FontClass::Table => 2.0,
        }
    }

    /// Initial size before any resize.
    pub const fn default_size(self) -> f64 {
        match self {
            FontClass::Titles => 14.0,
            FontClass::Legend | FontClass::Axes | FontClass::Table => 12.0,
            FontClass::Tooltips => 10.0,
        }
    }

    pub const fn pin(self) -> FontPins {
        match self {
            FontClass::Titles => FontPins::TITLES,
            FontClass::Legend => FontPins::LEGEND,
            FontClass::Axes => FontPins::AXES,
            FontClass::Tooltips => FontPins::TOOLTIPS,
            FontClass::Table => FontPins::TABLE,
        }
    }
}

bitflags::bitflags! {
    /// Text classes whose size was set explicitly.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FontPins: u8 {
        const TITLES   = 0b0000_0001;
        const LEGEND   = 0b0000_0010;
        const AXES     = 0b0000_0100;
        const TOOLTIPS = 0b0000_1000;
        const TABLE    = 0b0001_0000;
    }
}

/// Base size for a cell of the given width.
pub fn stepped_size(cell_width: f64) -> f64 {
    if cell_width <= 50.0 {
        5.0
    } else if cell_width <= 150.0 {
        10.0
    } else if cell_width <= 500.0 {
        15.0
    } else if cell_width <= 1000.0 {
        20.0
    } else {
        25.0
    }
}

/// Current font sizes.
#[derive(Debug, Clone, PartialEq)]
pub struct Typography {
    sizes: [f64; 5],
    pins: FontPins,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            sizes: FontClass::ALL.map(FontClass::default_size),
            pins: FontPins::empty(),
        }
    }
}

impl Typography {
    /// Pin `class` at `size`.
    #[must_use]
    pub fn pinned(mut self, class: FontClass, size: f64) -> Self {
        self.sizes[class.index()] = size;
        self.pins |= class.pin();
        self
    }

    pub fn size(&self, class: FontClass) -> f64 {
        self.sizes[class.index()]
    }

    pub fn pins(&self) -> FontPins {
        self.pins
    }

    pub fn is_pinned(&self, class: FontClass) -> bool {
        self.pins.contains(class.pin())
    }

    /// Recompute unpinned sizes for `cell_width`. Returns whether any size
    /// changed.
    pub fn resize_for_cell_width(&mut self, cell_width: f64) -> bool {
        let base = stepped_size(cell_width);
        let mut changed = false;
        for class in FontClass::ALL {
            if self.is_pinned(class) {
                continue;
            }
            let next = (base - class.adjustment()).max(1.0);
            let slot = &mut self.sizes[class.index()];
            if *slot != next {
                *slot = next;
                changed = true;
            }
        }
        changed
    }
}

/// Approximate rendered width of `text` at `font_size`.
///
/// Uses terminal display width so wide glyphs count double.
pub fn text_width(text: &str, font_size: f64) -> f64 {
    text.width() as f64 * font_size * 0.6
}
