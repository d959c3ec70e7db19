//! Font family classification and Standard-14 metrics.
//!
//! Replacement text is always drawn with one of the Standard-14 font
//! programs, chosen by a substring heuristic on whatever family name the
//! viewer reported for the original run. All precedence rules live in
//! [`FontSpec::classify`]: generic CSS families map directly, otherwise
//! `courier` beats `times`, and anything unrecognized falls back to
//! Helvetica.
//!
//! The width tables are the Adobe core AFM advances (units of 1/1000 em)
//! for the printable ASCII range. Oblique/italic cuts share their upright
//! table; for the preview-vs-output tolerance this system accepts, that is
//! close enough, and it keeps the tables at four instead of eight.

use serde::{Deserialize, Serialize};

/// The three replaceable family groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFamily {
    Helvetica,
    Times,
    Courier,
}

/// A fully resolved font selection: family group plus weight and slant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: FontFamily,
    pub bold: bool,
    pub italic: bool,
}

impl FontSpec {
    /// Classify a reported family name into a font selection.
    ///
    /// Precedence: exact CSS generic names first, then `courier`/`mono`
    /// substrings, then `times`/`georgia`/`garamond`, default Helvetica.
    pub fn classify(family: Option<&str>, bold: bool, italic: bool) -> Self {
        let family = match family {
            Some(name) => classify_family(name),
            None => FontFamily::Helvetica,
        };
        FontSpec { family, bold, italic }
    }

    /// The Standard-14 BaseFont name for this selection.
    pub fn base_font(&self) -> &'static str {
        match (self.family, self.bold, self.italic) {
            (FontFamily::Helvetica, false, false) => "Helvetica",
            (FontFamily::Helvetica, true, false) => "Helvetica-Bold",
            (FontFamily::Helvetica, false, true) => "Helvetica-Oblique",
            (FontFamily::Helvetica, true, true) => "Helvetica-BoldOblique",
            (FontFamily::Times, false, false) => "Times-Roman",
            (FontFamily::Times, true, false) => "Times-Bold",
            (FontFamily::Times, false, true) => "Times-Italic",
            (FontFamily::Times, true, true) => "Times-BoldItalic",
            (FontFamily::Courier, false, false) => "Courier",
            (FontFamily::Courier, true, false) => "Courier-Bold",
            (FontFamily::Courier, false, true) => "Courier-Oblique",
            (FontFamily::Courier, true, true) => "Courier-BoldOblique",
        }
    }

    /// The CSS generic family the preview falls back to.
    pub fn css_fallback(&self) -> &'static str {
        match self.family {
            FontFamily::Helvetica => "sans-serif",
            FontFamily::Times => "serif",
            FontFamily::Courier => "monospace",
        }
    }
}

fn classify_family(name: &str) -> FontFamily {
    let lower = name.trim().to_lowercase();

    match lower.as_str() {
        "serif" => return FontFamily::Times,
        "sans-serif" => return FontFamily::Helvetica,
        "monospace" => return FontFamily::Courier,
        _ => {}
    }

    if lower.contains("courier") || lower.contains("mono") {
        return FontFamily::Courier;
    }
    if lower.contains("times") || lower.contains("georgia") || lower.contains("garamond") {
        return FontFamily::Times;
    }
    FontFamily::Helvetica
}

/// Whether an embedded font name advertises a bold cut.
pub fn name_implies_bold(name: &str) -> bool {
    name.to_lowercase().contains("bold")
}

/// Whether an embedded font name advertises an italic or oblique cut.
pub fn name_implies_italic(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("italic") || lower.contains("oblique")
}

/// Width of `text` rendered in `spec` at `size`, in the same unit as `size`
/// (points in, points out; pixels in, pixels out).
pub fn text_width(text: &str, spec: FontSpec, size: f64) -> f64 {
    let units: f64 = text.chars().map(|c| char_width_units(spec, c)).sum();
    units * size / 1000.0
}

/// Advance width of one character in 1/1000 em.
fn char_width_units(spec: FontSpec, ch: char) -> f64 {
    if spec.family == FontFamily::Courier {
        return COURIER_ADVANCE;
    }
    let table = match (spec.family, spec.bold) {
        (FontFamily::Helvetica, false) => &HELVETICA,
        (FontFamily::Helvetica, true) => &HELVETICA_BOLD,
        (FontFamily::Times, false) => &TIMES_ROMAN,
        (FontFamily::Times, true) => &TIMES_BOLD,
        (FontFamily::Courier, _) => unreachable!(),
    };
    let code = ch as u32;
    if (0x20..=0x7e).contains(&code) {
        table[(code - 0x20) as usize]
    } else {
        DEFAULT_ADVANCE
    }
}

/// All Courier cuts are fixed-pitch at 600/1000.
const COURIER_ADVANCE: f64 = 600.0;

/// Advance used for glyphs outside the tables (accented Latin, symbols).
const DEFAULT_ADVANCE: f64 = 500.0;

// AFM advances for 0x20..=0x7E, row-major in code point order.
#[rustfmt::skip]
const HELVETICA: [f64; 95] = [
    278.0, 278.0, 355.0, 556.0, 556.0, 889.0, 667.0, 191.0, // space ! " # $ % & '
    333.0, 333.0, 389.0, 584.0, 278.0, 333.0, 278.0, 278.0, // ( ) * + , - . /
    556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, // 0-7
    556.0, 556.0, 278.0, 278.0, 584.0, 584.0, 584.0, 556.0, // 8 9 : ; < = > ?
    1015.0, 667.0, 667.0, 722.0, 722.0, 667.0, 611.0, 778.0, // @ A-G
    722.0, 278.0, 500.0, 667.0, 556.0, 833.0, 722.0, 778.0, // H-O
    667.0, 778.0, 722.0, 667.0, 611.0, 722.0, 667.0, 944.0, // P-W
    667.0, 667.0, 611.0, 278.0, 278.0, 278.0, 469.0, 556.0, // X Y Z [ \ ] ^ _
    333.0, 556.0, 556.0, 500.0, 556.0, 556.0, 278.0, 556.0, // ` a-g
    556.0, 222.0, 222.0, 500.0, 222.0, 833.0, 556.0, 556.0, // h-o
    556.0, 556.0, 333.0, 500.0, 278.0, 556.0, 500.0, 722.0, // p-w
    500.0, 500.0, 500.0, 334.0, 260.0, 334.0, 584.0,        // x y z { | } ~
];

#[rustfmt::skip]
const HELVETICA_BOLD: [f64; 95] = [
    278.0, 333.0, 474.0, 556.0, 556.0, 889.0, 722.0, 238.0,
    333.0, 333.0, 389.0, 584.0, 278.0, 333.0, 278.0, 278.0,
    556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0,
    556.0, 556.0, 333.0, 333.0, 584.0, 584.0, 584.0, 611.0,
    975.0, 722.0, 722.0, 722.0, 722.0, 667.0, 611.0, 778.0,
    722.0, 278.0, 556.0, 722.0, 611.0, 833.0, 722.0, 778.0,
    667.0, 778.0, 722.0, 667.0, 611.0, 722.0, 667.0, 944.0,
    667.0, 667.0, 611.0, 333.0, 278.0, 333.0, 584.0, 556.0,
    333.0, 556.0, 611.0, 556.0, 611.0, 556.0, 333.0, 611.0,
    611.0, 278.0, 278.0, 556.0, 278.0, 889.0, 611.0, 611.0,
    611.0, 611.0, 389.0, 556.0, 333.0, 611.0, 556.0, 778.0,
    556.0, 556.0, 500.0, 389.0, 280.0, 389.0, 584.0,
];

#[rustfmt::skip]
const TIMES_ROMAN: [f64; 95] = [
    250.0, 333.0, 408.0, 500.0, 500.0, 833.0, 778.0, 180.0,
    333.0, 333.0, 500.0, 564.0, 250.0, 333.0, 250.0, 278.0,
    500.0, 500.0, 500.0, 500.0, 500.0, 500.0, 500.0, 500.0,
    500.0, 500.0, 278.0, 278.0, 564.0, 564.0, 564.0, 444.0,
    921.0, 722.0, 667.0, 667.0, 722.0, 611.0, 556.0, 722.0,
    722.0, 333.0, 389.0, 722.0, 611.0, 889.0, 722.0, 722.0,
    556.0, 722.0, 667.0, 556.0, 611.0, 722.0, 722.0, 944.0,
    722.0, 722.0, 611.0, 333.0, 278.0, 333.0, 469.0, 500.0,
    333.0, 444.0, 500.0, 444.0, 500.0, 444.0, 333.0, 500.0,
    500.0, 278.0, 278.0, 500.0, 278.0, 778.0, 500.0, 500.0,
    500.0, 500.0, 333.0, 389.0, 278.0, 500.0, 500.0, 722.0,
    500.0, 500.0, 444.0, 480.0, 200.0, 480.0, 541.0,
];

#[rustfmt::skip]
const TIMES_BOLD: [f64; 95] = [
    250.0, 333.0, 555.0, 500.0, 500.0, 1000.0, 833.0, 278.0,
    333.0, 333.0, 500.0, 570.0, 250.0, 333.0, 250.0, 278.0,
    500.0, 500.0, 500.0, 500.0, 500.0, 500.0, 500.0, 500.0,
    500.0, 500.0, 333.0, 333.0, 570.0, 570.0, 570.0, 500.0,
    930.0, 722.0, 667.0, 722.0, 722.0, 667.0, 611.0, 778.0,
    778.0, 389.0, 500.0, 778.0, 667.0, 944.0, 722.0, 778.0,
    611.0, 778.0, 722.0, 556.0, 667.0, 722.0, 722.0, 1000.0,
    722.0, 722.0, 667.0, 333.0, 278.0, 333.0, 581.0, 500.0,
    333.0, 500.0, 556.0, 444.0, 556.0, 444.0, 333.0, 500.0,
    556.0, 278.0, 333.0, 556.0, 278.0, 833.0, 556.0, 500.0,
    556.0, 556.0, 444.0, 389.0, 333.0, 556.0, 500.0, 722.0,
    500.0, 500.0, 444.0, 394.0, 220.0, 394.0, 520.0,
];
