//! Pending document collection for the application wizard.

use crate::api::FilePart;
use crate::api::cofo::CofoDocument;

use std::collections::BTreeMap;

use uuid::Uuid;

/// A file attached in the upload step, held client-side until the
/// terminal submission.
#[derive(Debug, Clone)]
pub struct PendingDocument {
    pub id: Uuid,
    /// Category key from the requirement catalogue.
    pub category: String,
    pub title: String,
    pub file: FilePart,
}

impl PendingDocument {
    pub fn new(category: impl Into<String>, title: impl Into<String>, file: FilePart) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: category.into(),
            title: title.into(),
            file,
        }
    }
}

/// Ordered per-category document store.
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    by_category: BTreeMap<String, Vec<PendingDocument>>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, document: PendingDocument) {
        self.by_category
            .entry(document.category.clone())
            .or_default()
            .push(document);
    }

    /// Remove one file by id. Returns whether anything was removed.
    pub fn remove(&mut self, category: &str, id: Uuid) -> bool {
        match self.by_category.get_mut(category) {
            Some(documents) => {
                let before = documents.len();
                documents.retain(|doc| doc.id != id);
                before != documents.len()
            }
            None => false,
        }
    }

    pub fn in_category(&self, category: &str) -> &[PendingDocument] {
        self.by_category
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_any(&self, category: &str) -> bool {
        !self.in_category(category).is_empty()
    }

    pub fn total_files(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_files() == 0
    }

    /// Flatten into submission order (category order, then attach order).
    pub fn to_submission(&self) -> Vec<CofoDocument> {
        self.by_category
            .values()
            .flatten()
            .map(|doc| CofoDocument {
                document_type: doc.category.clone(),
                title: doc.title.clone(),
                file: doc.file.clone(),
            })
            .collect()
    }
}
