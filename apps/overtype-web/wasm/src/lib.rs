//! Browser bindings for the Overtype editor session.
//!
//! The JavaScript shell keeps ownership of everything DOM-shaped: the
//! canvas, the text-layer spans, the input overlay, and the pdf.js render
//! calls. This crate owns the session state behind them — regions, edits,
//! scale, render ordering — and hands the shell plain data: region lists
//! to lay out, paint programs to replay, instruction JSON to export.
//!
//! The expected call sequence per page render:
//! 1. `begin_render(page, container_width, page_width)` -> generation
//! 2. shell renders the page bitmap at `effective_scale()`
//! 3. `commit_render(generation, …)` with the page's text content; a
//!    `false` return means the render was superseded and must be dropped.

use std::collections::HashMap;

use wasm_bindgen::prelude::*;

use overtype_core::{
    compose, extract_regions, CanvasSize, Edit, EditId, EditLedger, FontStyle, ImageOverlay,
    MutationInstruction, PageViewport, Pt, Px, RenderSequencer, RenderTicket, Scale, TextItem,
    TextRegion, ViewportScale,
};

#[wasm_bindgen]
pub struct EditorSession {
    regions: Vec<TextRegion>,
    ledger: EditLedger,
    overlays: Vec<ImageOverlay>,
    viewport: ViewportScale,
    sequencer: RenderSequencer,
    tickets: HashMap<u64, RenderTicket>,
    current_page: u32,
    current_scale: Scale,
    canvas: Option<CanvasSize>,
}

#[wasm_bindgen]
impl EditorSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook::set_once();
        Self {
            regions: Vec::new(),
            ledger: EditLedger::new(),
            overlays: Vec::new(),
            viewport: ViewportScale::new(),
            sequencer: RenderSequencer::new(),
            tickets: HashMap::new(),
            current_page: 1,
            current_scale: Scale::new(1.0),
            canvas: None,
        }
    }

    /// Drop all per-document state. Call when the user loads a new file.
    pub fn reset_document(&mut self) {
        self.regions.clear();
        self.ledger.clear();
        self.overlays.clear();
        self.canvas = None;
        self.tickets.clear();
        self.current_page = 1;
    }

    // ---- viewport ----------------------------------------------------

    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.viewport.set_zoom(zoom);
        self.effective_scale()
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.viewport.zoom_in();
        self.effective_scale()
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.viewport.zoom_out();
        self.effective_scale()
    }

    pub fn effective_scale(&self) -> f64 {
        self.viewport.effective().value()
    }

    // ---- render pipeline ---------------------------------------------

    /// Start a page render. Recomputes the fit factor for the current
    /// container width and supersedes every earlier render.
    pub fn begin_render(
        &mut self,
        page: u32,
        container_width_px: f64,
        page_width_pt: f64,
    ) -> u64 {
        self.viewport.fit_to_container(container_width_px, page_width_pt);
        let ticket = self.sequencer.begin(page, self.viewport.effective());
        let generation = ticket.generation();
        // Older tickets can never commit; drop them now.
        self.tickets.clear();
        self.tickets.insert(generation, ticket);
        generation
    }

    /// Publish a finished render: rebuild the region list from the page's
    /// text content. Returns false when the render was superseded by a
    /// newer `begin_render`, in which case nothing changes.
    #[allow(clippy::too_many_arguments)]
    pub fn commit_render(
        &mut self,
        generation: u64,
        page_height_pt: f64,
        canvas_width: f64,
        canvas_height: f64,
        items: JsValue,
        styles: JsValue,
    ) -> Result<bool, JsValue> {
        let Some(ticket) = self.tickets.remove(&generation) else {
            return Ok(false);
        };
        if !self.sequencer.try_commit(&ticket) {
            return Ok(false);
        }

        let items: Vec<TextItem> = serde_wasm_bindgen::from_value(items)
            .map_err(|e| JsValue::from_str(&format!("Invalid text items: {e}")))?;
        let styles: HashMap<String, FontStyle> = if styles.is_null() || styles.is_undefined() {
            HashMap::new()
        } else {
            serde_wasm_bindgen::from_value(styles)
                .map_err(|e| JsValue::from_str(&format!("Invalid style table: {e}")))?
        };

        let viewport = PageViewport { scale: ticket.scale, page_height: Pt(page_height_pt) };
        self.regions = extract_regions(ticket.page, &items, &styles, viewport);
        self.current_page = ticket.page;
        self.current_scale = ticket.scale;
        self.canvas = Some(CanvasSize { width: canvas_width, height: canvas_height });
        Ok(true)
    }

    // ---- regions and edits -------------------------------------------

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// The clickable region list for the committed page.
    pub fn regions(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.regions)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Open (or reopen) the edit for a region. Returns the edit the input
    /// overlay should display.
    pub fn click_region(&mut self, region_index: u32) -> Result<JsValue, JsValue> {
        let edit = self
            .click_region_inner(region_index)
            .ok_or_else(|| JsValue::from_str(&format!("No region {region_index} on this page")))?;
        serde_wasm_bindgen::to_value(&edit).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Replace the text of an open edit on every keystroke.
    pub fn set_edit_text(&mut self, page: u32, region_index: u32, text: String) -> bool {
        self.ledger.set_text(EditId { page, region: region_index }, text)
    }

    pub fn edit_count(&self) -> usize {
        self.ledger.len()
    }

    /// Record an image overlay at the given viewport-pixel geometry.
    pub fn add_image_overlay(
        &mut self,
        page: u32,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        data_url: String,
    ) {
        self.overlays.push(ImageOverlay {
            page,
            x: Px(x),
            y: Px(y),
            width: Px(width),
            height: Px(height),
            data_url,
            scale_at_creation: self.current_scale,
        });
    }

    // ---- output ------------------------------------------------------

    /// The paint program for the committed page. Empty until a render has
    /// been committed — compositing without a snapshot is a no-op.
    pub fn compose_preview(&self) -> Result<JsValue, JsValue> {
        let ops = compose(&self.ledger, self.current_page, self.canvas);
        serde_wasm_bindgen::to_value(&ops).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Serialize every edit and overlay into the instruction array the
    /// annotate endpoint expects. Reads the ledger; never mutates it.
    pub fn export_instructions(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.instruction_snapshot())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl EditorSession {
    fn click_region_inner(&mut self, region_index: u32) -> Option<Edit> {
        let id = EditId { page: self.current_page, region: region_index };
        if let Some(existing) = self.ledger.get(id) {
            return Some(existing.clone());
        }

        let region = self
            .regions
            .iter()
            .find(|r| r.index == region_index && r.page == self.current_page)?
            .clone();
        let edit = Edit::new(region, self.current_scale);
        self.ledger.upsert(edit.clone());
        Some(edit)
    }

    fn instruction_snapshot(&self) -> Vec<MutationInstruction> {
        let mut instructions: Vec<MutationInstruction> =
            self.ledger.iter().map(Edit::to_instruction).collect();
        instructions.extend(self.overlays.iter().map(ImageOverlay::to_instruction));
        instructions
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}
