//! The document-collection store seam.
//!
//! The engine is read-only over a hierarchical store of collections
//! (containers), documents, and metadata records. [`CollectionStore`]
//! captures the exact capabilities the auditors need, so any storage
//! hierarchy can back an audit. Two implementations ship with the crate:
//! [`MemoryStore`] for tests and embedding, [`FsStore`] over a directory
//! tree for the command-line tool.

mod fs;
mod memory;

pub use fs::FsStore;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::model::{Document, MetadataRecord};

/// Read-only access to the document-collection hierarchy.
///
/// Collections are addressed by store-specific string ids; `""` is the
/// hierarchy root. The engine never mutates the store.
pub trait CollectionStore: Send + Sync {
    /// Direct child documents of a collection, in listing order.
    fn documents(&self, collection: &str) -> Result<Vec<Document>>;

    /// Direct child documents whose declared media type matches.
    fn documents_with_media_type(
        &self,
        collection: &str,
        media_type: &str,
    ) -> Result<Vec<Document>> {
        Ok(self
            .documents(collection)?
            .into_iter()
            .filter(|d| d.media_type == media_type)
            .collect())
    }

    /// The containment chain starting at `collection` itself and ending
    /// at the hierarchy root.
    fn ancestry(&self, collection: &str) -> Result<Vec<String>>;

    /// Direct child container of `collection` with the given name.
    fn child_container(&self, collection: &str, name: &str) -> Result<Option<String>>;

    /// First container named `name` within `collection`'s subtree,
    /// in the store's deterministic listing order. The collection itself
    /// is not a candidate.
    fn find_container(&self, collection: &str, name: &str) -> Result<Option<String>>;

    /// Metadata records held directly by `collection`, in listing order.
    fn metadata_records(&self, collection: &str) -> Result<Vec<MetadataRecord>>;
}
