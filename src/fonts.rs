//! Metrics for the two standard faces the contract template uses.
//!
//! The template is filled with the non-embedded Type1 Helvetica faces, so
//! measurement uses the AFM advance widths (thousandths of an em) compiled
//! in as data. Characters outside the ASCII table fall back to an average
//! advance, which is accurate enough for fit decisions on names, emails and
//! phone numbers.

/// Advance widths for Helvetica, ASCII 32..=126, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Advance widths for Helvetica-Bold, ASCII 32..=126, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333,
    584, 584, 584, 611, 975, 722, 722, 722, 722, 667, 611, 778, 722, 278,
    556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556,
    333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556,
    333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Fallback advance for characters outside the compiled table (accented
/// Latin letters mostly match their base glyph width in Helvetica).
const DEFAULT_ADVANCE: u16 = 556;

/// Advance of the horizontal ellipsis glyph in both faces.
const ELLIPSIS_ADVANCE: u16 = 1000;

/// One of the standard faces available on every page of the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Helvetica,
    HelveticaBold,
}

impl Face {
    /// Resource name the face is registered under in page resources.
    pub fn resource_name(self) -> &'static str {
        match self {
            Face::Helvetica => "F1",
            Face::HelveticaBold => "F2",
        }
    }

    pub fn base_font(self) -> &'static str {
        match self {
            Face::Helvetica => "Helvetica",
            Face::HelveticaBold => "Helvetica-Bold",
        }
    }

    fn advance(self, c: char) -> u16 {
        if c == '\u{2026}' {
            return ELLIPSIS_ADVANCE;
        }
        let table = match self {
            Face::Helvetica => &HELVETICA_WIDTHS,
            Face::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        };
        let code = c as u32;
        if (32..=126).contains(&code) {
            table[(code - 32) as usize]
        } else {
            DEFAULT_ADVANCE
        }
    }
}

/// Measurement provider for the text fit engine.
pub trait FontMetrics {
    /// Width of `text` rendered at `size` points.
    fn text_width(&self, text: &str, size: f32) -> f32;
}

impl FontMetrics for Face {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(self.advance(c))).sum();
        units as f32 / 1000.0 * size
    }
}
