//! Per-invocation Standard-14 font cache.
//!
//! Each engine invocation owns exactly one cache; it is passed by mutable
//! reference into instruction processing and dropped with the invocation,
//! so font object ids can never leak between unrelated documents.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object, ObjectId};
use overtype_core::FontSpec;

/// A font already registered in the output document.
#[derive(Debug, Clone)]
pub struct FontHandle {
    pub object_id: ObjectId,
    /// Resource name the content stream selects the font by (`/OtF1 …`).
    pub resource_name: String,
}

#[derive(Debug, Default)]
pub struct FontCache {
    entries: HashMap<FontSpec, FontHandle>,
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the handle for `spec`, embedding the font dictionary into
    /// `doc` on first use.
    pub fn resolve(&mut self, doc: &mut Document, spec: FontSpec) -> FontHandle {
        if let Some(handle) = self.entries.get(&spec) {
            return handle.clone();
        }

        let mut dict = Dictionary::new();
        dict.set("Type", Object::Name(b"Font".to_vec()));
        dict.set("Subtype", Object::Name(b"Type1".to_vec()));
        dict.set("BaseFont", Object::Name(spec.base_font().as_bytes().to_vec()));
        dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));

        let object_id = doc.add_object(Object::Dictionary(dict));
        let handle = FontHandle {
            object_id,
            resource_name: format!("OtF{}", self.entries.len() + 1),
        };
        self.entries.insert(spec, handle.clone());
        handle
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
