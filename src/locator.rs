//! PDF candidate enumeration within a collection.

use crate::error::Result;
use crate::model::{Document, PDF_MEDIA_TYPE};
use crate::store::CollectionStore;

/// Enumerates the PDF documents eligible for auditing.
pub struct DocumentLocator<'a> {
    store: &'a dyn CollectionStore,
}

impl<'a> DocumentLocator<'a> {
    /// Create a locator over the given store.
    pub fn new(store: &'a dyn CollectionStore) -> Self {
        Self { store }
    }

    /// Direct children of the collection whose media type is
    /// `application/pdf`.
    ///
    /// Filtering is on the media-type field itself, never on a structural
    /// "kind" tag: structural labels may be localized and unreliable.
    /// A declared PDF whose bytes lack the PDF magic is still returned
    /// (the declared type decides), but the mismatch is logged.
    pub fn list_candidates(&self, collection: &str) -> Result<Vec<Document>> {
        let documents = self
            .store
            .documents_with_media_type(collection, PDF_MEDIA_TYPE)?;
        for document in &documents {
            if !document.looks_like_pdf() {
                log::warn!(
                    "{} is declared {PDF_MEDIA_TYPE} but does not start with the PDF magic",
                    document.filename
                );
            }
        }
        Ok(documents)
    }
}
