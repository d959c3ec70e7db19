//! PDF mutation engine for Overtype.
//!
//! Takes original PDF bytes plus an ordered list of point-space
//! [`MutationInstruction`]s and produces a regenerated document: original
//! glyph runs masked with opaque rectangles, replacement text drawn with
//! matched Standard-14 fonts, raster overlays embedded as image XObjects.
//!
//! The engine is stateless across invocations — each call owns its
//! document, font cache, and buffers — so concurrent requests for
//! different documents never share mutable state.
//!
//! [`MutationInstruction`]: overtype_core::MutationInstruction

pub mod engine;
pub mod error;
pub mod fonts;
pub mod image;

pub use engine::{apply_instructions, ApplyOutcome, ApplyReport};
pub use error::{ImageError, MutateError};
