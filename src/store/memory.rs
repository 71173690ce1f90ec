//! In-memory document storage, used by tests

use std::sync::Mutex;

use super::{Document, StoreBackend};

/// Keeps the document in process memory; load clones, save replaces
#[derive(Default)]
pub struct MemoryBackend {
    doc: Mutex<Document>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a pre-populated document
    pub fn with_document(doc: Document) -> Self {
        Self {
            doc: Mutex::new(doc),
        }
    }
}

impl StoreBackend for MemoryBackend {
    fn load(&self) -> Document {
        self.doc.lock().map(|doc| doc.clone()).unwrap_or_default()
    }

    fn save(&self, doc: &Document) -> std::io::Result<()> {
        match self.doc.lock() {
            Ok(mut slot) => {
                *slot = doc.clone();
                Ok(())
            }
            Err(_) => Err(std::io::Error::other("memory store poisoned")),
        }
    }
}
