//! Clickable text-region extraction.
//!
//! The viewer hands us the raw text-content items it got from rendering a
//! page: one entry per text run, each with the run's text-space transform,
//! string content, point extents, and the resource name of its font. We
//! project those through the viewport transform into pixel space and attach
//! inferred style, producing the clickable region list the edit UI works on.
//!
//! Regions are derived state. They are rebuilt from scratch whenever the
//! page, document, or render scale changes, and are never persisted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::font::{name_implies_bold, name_implies_italic};
use crate::geometry::{Pt, Px, Scale};

/// Point extents assumed when an item reports no usable width.
const FALLBACK_WIDTH_PT: f64 = 50.0;

/// Point extents assumed when an item reports no usable height.
const FALLBACK_HEIGHT_PT: f64 = 12.0;

/// Smallest pixel font size a region will ever claim.
const MIN_FONT_PX: f64 = 6.0;

/// One text run as reported by the page renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextItem {
    /// Run content. The renderer calls this field `str`.
    #[serde(rename = "str", alias = "text")]
    pub text: String,
    /// Text-space transform `[a b c d e f]`; absent for non-glyph items.
    #[serde(default)]
    pub transform: Option<[f64; 6]>,
    /// Advance width of the run in points.
    #[serde(default)]
    pub width: f64,
    /// Glyph box height in points.
    #[serde(default)]
    pub height: f64,
    /// Resource name of the run's font (e.g. `g_d0_f1`).
    #[serde(default)]
    pub font_name: String,
}

/// Style-table entry mapping a font resource name to a family descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontStyle {
    #[serde(default)]
    pub font_family: String,
}

/// The viewport a page was rendered into: effective scale plus the page
/// height needed to flip the y axis.
#[derive(Debug, Clone, Copy)]
pub struct PageViewport {
    pub scale: Scale,
    pub page_height: Pt,
}

impl PageViewport {
    /// Project a text-space origin `(e, f)` into viewport pixels.
    ///
    /// The viewport transform for scale `s` over a page of height `H` is
    /// `[s 0 0 -s 0 sH]`; composing it with the item transform lands the
    /// run origin at `(s*e, s*(H - f))`.
    fn project(&self, e: f64, f: f64) -> (Px, Px) {
        let s = self.scale.value();
        (Px(s * e), Px(s * (self.page_height.0 - f)))
    }
}

/// One clickable region: a run of original text with inferred metrics,
/// expressed in viewport pixels at the extraction scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRegion {
    /// 1-based page index.
    pub page: u32,
    /// Position of the source item in the page's text content. Skipped
    /// items still consume an index, so ids survive filtering.
    pub index: u32,
    /// Baseline anchor: `y` is the bottom of the glyph box.
    pub x: Px,
    pub y: Px,
    pub width: Px,
    pub height: Px,
    pub font_size_px: Px,
    pub font_family: String,
    pub is_bold: bool,
    pub is_italic: bool,
    pub original_text: String,
}

/// Build the clickable region list for one rendered page.
pub fn extract_regions(
    page: u32,
    items: &[TextItem],
    styles: &HashMap<String, FontStyle>,
    viewport: PageViewport,
) -> Vec<TextRegion> {
    let s = viewport.scale.value();
    let mut regions = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let Some(transform) = item.transform else {
            continue;
        };
        if item.text.trim().is_empty() {
            continue;
        }

        let [a, b, _c, _d, e, f] = transform;
        let (x, y) = viewport.project(e, f);

        let width_pt = if item.width > 0.0 { item.width } else { FALLBACK_WIDTH_PT };
        let height_pt = if item.height > 0.0 { item.height } else { FALLBACK_HEIGHT_PT };

        let font_family = styles
            .get(&item.font_name)
            .map(|style| style.font_family.clone())
            .unwrap_or_default();

        let is_italic =
            name_implies_italic(&font_family) || name_implies_italic(&item.font_name);
        let is_bold = name_implies_bold(&font_family) || name_implies_bold(&item.font_name);

        // The glyph scale is the length of the transform's first column.
        let font_size_px = (a.hypot(b) * s).max(MIN_FONT_PX);

        regions.push(TextRegion {
            page,
            index: index as u32,
            x,
            y,
            width: Pt(width_pt).to_px(viewport.scale),
            height: Pt(height_pt).to_px(viewport.scale),
            font_size_px: Px(font_size_px),
            font_family,
            is_bold,
            is_italic,
            original_text: item.text.clone(),
        });
    }

    regions
}
