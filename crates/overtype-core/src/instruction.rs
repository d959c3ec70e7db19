//! The wire contract between the viewer and the mutation engine.
//!
//! Instructions are JSON, tagged by `type`, camelCase, and entirely in PDF
//! point space. Vertical positions are top-anchored (`y` is the distance
//! from the page top to the top of the box) because that is what the
//! viewer captured; the engine converts to PDF-native bottom-left per
//! instruction.
//!
//! Decoding has two failure levels: JSON that is not an array at all fails
//! the whole batch, while an element that is valid JSON but not a valid
//! instruction is dropped and counted. The export endpoint relies on that
//! asymmetry.

use serde::{Deserialize, Serialize};

use crate::geometry::{Px, Scale};
use crate::ledger::Edit;

/// RGB color with channels nominally in `[0, 1]`; out-of-range input is
/// clamped at draw time, not rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RgbColor {
    #[serde(default)]
    pub r: f64,
    #[serde(default)]
    pub g: f64,
    #[serde(default)]
    pub b: f64,
}

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor { r: 0.0, g: 0.0, b: 0.0 };

    pub fn clamped(self) -> (f64, f64, f64) {
        (
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
    }
}

fn default_page() -> u32 {
    1
}

fn default_x() -> f64 {
    40.0
}

fn default_y_top() -> f64 {
    80.0
}

fn default_box_width() -> f64 {
    50.0
}

fn default_box_height() -> f64 {
    12.0
}

/// One normalized paint directive for the mutation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MutationInstruction {
    #[serde(rename_all = "camelCase")]
    Text {
        #[serde(default = "default_page")]
        page: u32,
        #[serde(default = "default_x")]
        x: f64,
        /// Top of the box, measured down from the page top, in points.
        #[serde(rename = "y", default = "default_y_top")]
        y_top: f64,
        #[serde(default)]
        text: String,
        #[serde(default)]
        original_text: String,
        /// Falls back to the box height when absent, like the viewer does.
        #[serde(default)]
        font_size: Option<f64>,
        #[serde(default)]
        color: RgbColor,
        #[serde(default)]
        hide_original: bool,
        #[serde(default = "default_box_width")]
        original_width: f64,
        #[serde(default = "default_box_height")]
        original_height: f64,
        #[serde(default)]
        font_family: Option<String>,
        #[serde(default)]
        is_bold: bool,
        #[serde(default)]
        is_italic: bool,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        #[serde(default = "default_page")]
        page: u32,
        /// `data:<mime>;base64,<payload>`
        data_url: String,
        #[serde(default)]
        x: Option<f64>,
        /// Top-anchored; absent means the engine's fixed default position.
        #[serde(default)]
        y: Option<f64>,
        #[serde(default)]
        width: Option<f64>,
        #[serde(default)]
        height: Option<f64>,
    },
}

impl MutationInstruction {
    pub fn page(&self) -> u32 {
        match self {
            MutationInstruction::Text { page, .. } => *page,
            MutationInstruction::Image { page, .. } => *page,
        }
    }
}

/// Result of decoding an instruction array: the decodable instructions in
/// input order, plus the count of elements that were dropped.
#[derive(Debug, Default)]
pub struct InstructionBatch {
    pub instructions: Vec<MutationInstruction>,
    pub undecodable: usize,
}

/// Decode a JSON instruction array.
///
/// A structurally invalid payload (not JSON, not an array) errors and must
/// fail the caller's whole request. An individual element that does not
/// decode as an instruction is skipped and counted instead.
pub fn decode_batch(json: &str) -> Result<InstructionBatch, serde_json::Error> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;

    let mut batch = InstructionBatch::default();
    for value in values {
        match serde_json::from_value::<MutationInstruction>(value) {
            Ok(instruction) => batch.instructions.push(instruction),
            Err(_) => batch.undecodable += 1,
        }
    }
    Ok(batch)
}

impl Edit {
    /// Convert this edit into its wire instruction, dividing every pixel
    /// measurement by the scale the geometry was captured at.
    pub fn to_instruction(&self) -> MutationInstruction {
        let s = self.scale_at_creation;
        let r = &self.region;
        MutationInstruction::Text {
            page: r.page,
            x: r.x.to_pt(s).0,
            // The region anchor is the baseline; the box top is one box
            // height above it.
            y_top: Px(r.y.0 - r.height.0).to_pt(s).0,
            text: self.new_text.clone(),
            original_text: r.original_text.clone(),
            font_size: Some(r.font_size_px.to_pt(s).0),
            color: RgbColor::BLACK,
            hide_original: true,
            original_width: r.width.to_pt(s).0,
            original_height: r.height.to_pt(s).0,
            font_family: (!r.font_family.is_empty()).then(|| r.font_family.clone()),
            is_bold: r.is_bold,
            is_italic: r.is_italic,
        }
    }
}

/// A user-supplied raster overlay, carried in viewport pixels like an edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOverlay {
    pub page: u32,
    pub x: Px,
    pub y: Px,
    pub width: Px,
    pub height: Px,
    /// `data:image/png;base64,…` or `data:image/jpeg;base64,…`
    pub data_url: String,
    pub scale_at_creation: Scale,
}

impl ImageOverlay {
    pub fn to_instruction(&self) -> MutationInstruction {
        let s = self.scale_at_creation;
        MutationInstruction::Image {
            page: self.page,
            data_url: self.data_url.clone(),
            x: Some(self.x.to_pt(s).0),
            y: Some(self.y.to_pt(s).0),
            width: Some(self.width.to_pt(s).0),
            height: Some(self.height.to_pt(s).0),
        }
    }
}
