//! The edit ledger: per-session state of every touched region.
//!
//! Pure state. Holds no PDF bytes, performs no I/O; the compositor reads
//! it on every change and the export path snapshots it once. Edits are
//! never deleted within a session — they live until the document itself is
//! replaced.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geometry::Scale;
use crate::region::TextRegion;

/// Identity of an edit, derived from the region it replaces. Re-clicking
/// the same region therefore reopens the same edit instead of forking one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditId {
    pub page: u32,
    pub region: u32,
}

/// One user-authored replacement for a region's text.
///
/// All pixel geometry inside `region` is meaningful only at
/// `scale_at_creation` — the effective scale when the user clicked. The
/// export path divides by it; nothing else may reinterpret it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edit {
    pub region: TextRegion,
    pub new_text: String,
    pub scale_at_creation: Scale,
}

impl Edit {
    /// A fresh edit starts out replacing the text with itself.
    pub fn new(region: TextRegion, scale_at_creation: Scale) -> Self {
        let new_text = region.original_text.clone();
        Edit { region, new_text, scale_at_creation }
    }

    pub fn id(&self) -> EditId {
        EditId { page: self.region.page, region: self.region.index }
    }
}

/// Ordered, id-unique store of edits.
///
/// Insertion order is preserved so iteration (and therefore compositing
/// and export) is deterministic; ordering carries no other meaning.
#[derive(Debug, Default)]
pub struct EditLedger {
    order: Vec<EditId>,
    edits: HashMap<EditId, Edit>,
}

impl EditLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new edit or replace the existing one with the same id.
    pub fn upsert(&mut self, edit: Edit) {
        let id = edit.id();
        if self.edits.insert(id, edit).is_none() {
            self.order.push(id);
        }
    }

    pub fn get(&self, id: EditId) -> Option<&Edit> {
        self.edits.get(&id)
    }

    /// Update the replacement text of an existing edit. Returns false if
    /// the id is unknown.
    pub fn set_text(&mut self, id: EditId, text: impl Into<String>) -> bool {
        match self.edits.get_mut(&id) {
            Some(edit) => {
                edit.new_text = text.into();
                true
            }
            None => false,
        }
    }

    /// All edits, insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Edit> {
        self.order.iter().filter_map(|id| self.edits.get(id))
    }

    /// Edits on one page, insertion order.
    pub fn edits_for_page(&self, page: u32) -> impl Iterator<Item = &Edit> {
        self.iter().filter(move |edit| edit.region.page == page)
    }

    /// Owned copy of the current state, for the export path.
    pub fn snapshot(&self) -> Vec<Edit> {
        self.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drop everything; used when the document is replaced.
    pub fn clear(&mut self) {
        self.order.clear();
        self.edits.clear();
    }
}
