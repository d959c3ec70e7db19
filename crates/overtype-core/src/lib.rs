//! Viewer-side core for Overtype, the in-place PDF text editor.
//!
//! Everything here is pure state and math: no I/O, no PDF bytes, no DOM.
//! The browser shell (via the wasm bindings) and the export API both build
//! on these pieces:
//!
//! - [`geometry`]: pixel/point unit types and viewport scaling
//! - [`region`]: clickable text-region extraction from rendered pages
//! - [`ledger`]: the per-session edit store
//! - [`compositor`]: the live preview paint program
//! - [`pipeline`]: last-request-wins ordering for async renders
//! - [`font`]: family classification and Standard-14 width metrics
//! - [`instruction`]: the point-space wire contract to the mutation engine

pub mod compositor;
pub mod font;
pub mod geometry;
pub mod instruction;
pub mod ledger;
pub mod pipeline;
pub mod region;

pub use compositor::{compose, CanvasSize, PaintOp};
pub use font::{text_width, FontFamily, FontSpec};
pub use geometry::{Pt, Px, PxRect, PtRect, Scale, ViewportScale};
pub use instruction::{
    decode_batch, ImageOverlay, InstructionBatch, MutationInstruction, RgbColor,
};
pub use ledger::{Edit, EditId, EditLedger};
pub use pipeline::{RenderSequencer, RenderTicket};
pub use region::{extract_regions, FontStyle, PageViewport, TextItem, TextRegion};
