//! Live preview compositing.
//!
//! On every ledger change the visible page is repainted: restore the
//! pristine page bitmap, then for each edit mask the original run with an
//! opaque rectangle and draw the replacement text at the original
//! baseline. The compositor itself never touches a canvas — it emits a
//! deterministic paint program that the browser shell replays.
//!
//! This is a preview approximation only. The authoritative output comes
//! from the mutation engine; canvas font substitution may drift from the
//! embedded fonts and that drift is accepted.

use serde::{Deserialize, Serialize};

use crate::font::{text_width, FontSpec};
use crate::ledger::EditLedger;

/// Horizontal mask padding, px.
const PAD_X: f64 = 12.0;

/// Vertical mask padding, px.
const PAD_Y: f64 = 4.0;

/// Mask width floor — wide enough to hide form-field underlines that
/// extend past the measured text.
const MIN_MASK_WIDTH: f64 = 260.0;

/// Mask height floor, px.
const MIN_MASK_HEIGHT: f64 = 14.0;

/// Smallest font the preview will render, px.
const MIN_FONT_PX: f64 = 6.0;

/// Pixel size of the surface being composited onto.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

/// One step of the preview paint program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PaintOp {
    /// Put the pristine page bitmap back before any overlay painting.
    RestoreBase,
    /// Opaque white rectangle hiding the original run.
    #[serde(rename_all = "camelCase")]
    MaskRect { x: f64, y: f64, width: f64, height: f64 },
    /// Replacement text at the original baseline.
    #[serde(rename_all = "camelCase")]
    DrawText {
        x: f64,
        /// Baseline y, px from the canvas top.
        y: f64,
        text: String,
        font_px: f64,
        font_family: String,
        bold: bool,
        italic: bool,
    },
}

/// Build the paint program for one page.
///
/// `canvas` is the size of the pristine snapshot; when the page has not
/// been rendered yet there is nothing to composite onto, so the program is
/// empty — a no-op, never an error. Calling this twice with an unchanged
/// ledger yields an identical program.
pub fn compose(ledger: &EditLedger, page: u32, canvas: Option<CanvasSize>) -> Vec<PaintOp> {
    let Some(canvas) = canvas else {
        return Vec::new();
    };

    let mut ops = vec![PaintOp::RestoreBase];

    for edit in ledger.edits_for_page(page) {
        let r = &edit.region;
        let spec = FontSpec::classify(
            (!r.font_family.is_empty()).then_some(r.font_family.as_str()),
            r.is_bold,
            r.is_italic,
        );
        let font_px = r.font_size_px.0.max(MIN_FONT_PX);

        let old_width = text_width(&r.original_text, spec, font_px);
        let new_width = text_width(&edit.new_text, spec, font_px);

        let mask_width = r.width.0.max(old_width).max(new_width).max(MIN_MASK_WIDTH) + PAD_X * 2.0;
        let mask_height = r.height.0.max(MIN_MASK_HEIGHT) + PAD_Y * 2.0;

        let x0 = (r.x.0 - PAD_X).floor().max(0.0);
        let y0 = (r.y.0 - r.height.0 - PAD_Y).floor().max(0.0);

        ops.push(PaintOp::MaskRect {
            x: x0,
            y: y0,
            width: mask_width.min(canvas.width - x0),
            height: mask_height.min(canvas.height - y0),
        });

        let family = if r.font_family.trim().is_empty() {
            spec.css_fallback().to_string()
        } else {
            r.font_family.clone()
        };

        ops.push(PaintOp::DrawText {
            x: r.x.0,
            y: r.y.0,
            text: edit.new_text.clone(),
            font_px,
            font_family: family,
            bold: r.is_bold,
            italic: r.is_italic,
        });
    }

    ops
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::geometry::{Px, Scale};
    use crate::ledger::Edit;
    use crate::region::TextRegion;
    use proptest::prelude::*;

    fn arb_region() -> impl Strategy<Value = TextRegion> {
        (
            0.0f64..800.0,
            20.0f64..1000.0,
            1.0f64..400.0,
            4.0f64..40.0,
            "[ -~]{0,40}",
        )
            .prop_map(|(x, y, w, h, text)| TextRegion {
                page: 1,
                index: 0,
                x: Px(x),
                y: Px(y),
                width: Px(w),
                height: Px(h),
                font_size_px: Px(14.0),
                font_family: String::new(),
                is_bold: false,
                is_italic: false,
                original_text: text,
            })
    }

    proptest! {
        /// Property: the mask is always at least as wide as the widest of
        /// the original box, the measured old text, the measured new text,
        /// and the floor width.
        #[test]
        fn mask_covers_old_and_new_text(region in arb_region(), new_text in "[ -~]{0,60}") {
            let spec = FontSpec::classify(None, false, false);
            let font_px = region.font_size_px.0.max(6.0);
            let old_w = text_width(&region.original_text, spec, font_px);
            let new_w = text_width(&new_text, spec, font_px);
            let box_w = region.width.0;

            let mut ledger = EditLedger::new();
            let mut edit = Edit::new(region, Scale::new(1.0));
            edit.new_text = new_text;
            ledger.upsert(edit);

            // Canvas large enough that clipping does not kick in.
            let ops = compose(&ledger, 1, Some(CanvasSize { width: 5000.0, height: 5000.0 }));
            match &ops[1] {
                PaintOp::MaskRect { width, .. } => {
                    prop_assert!(*width >= box_w.max(old_w).max(new_w).max(260.0));
                }
                other => prop_assert!(false, "expected mask, got {other:?}"),
            }
        }
    }
}
