//! In-memory collection store for tests and embedding.

use super::CollectionStore;
use crate::error::{Error, Result};
use crate::model::{Document, MetadataRecord};
use std::collections::BTreeMap;

/// An in-memory hierarchy of collections.
///
/// Collection ids are `/`-separated paths; `""` is the root, which always
/// exists. Listing order is insertion order for documents and records,
/// lexicographic for containers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    containers: BTreeMap<String, Container>,
}

#[derive(Debug, Default)]
struct Container {
    documents: Vec<Document>,
    records: Vec<MetadataRecord>,
}

impl MemoryStore {
    /// Create a store holding only the root collection.
    pub fn new() -> Self {
        let mut containers = BTreeMap::new();
        containers.insert(String::new(), Container::default());
        Self { containers }
    }

    /// Add a container (and any missing ancestors) and return the store.
    pub fn with_container(mut self, path: &str) -> Self {
        self.add_container(path);
        self
    }

    /// Add a document to a container and return the store.
    pub fn with_document(mut self, path: &str, document: Document) -> Self {
        self.add_container(path);
        self.container_mut(path).documents.push(document);
        self
    }

    /// Add a metadata record to a container and return the store.
    pub fn with_record(mut self, path: &str, record: MetadataRecord) -> Self {
        self.add_container(path);
        self.container_mut(path).records.push(record);
        self
    }

    /// Add a container and any missing ancestors.
    pub fn add_container(&mut self, path: &str) {
        let mut current = String::new();
        self.containers.entry(current.clone()).or_default();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(segment);
            self.containers.entry(current.clone()).or_default();
        }
    }

    fn container_mut(&mut self, path: &str) -> &mut Container {
        self.containers.entry(path.to_string()).or_default()
    }

    fn container(&self, path: &str) -> Result<&Container> {
        self.containers
            .get(path)
            .ok_or_else(|| Error::Store(format!("no such collection: {path:?}")))
    }
}

impl CollectionStore for MemoryStore {
    fn documents(&self, collection: &str) -> Result<Vec<Document>> {
        Ok(self.container(collection)?.documents.clone())
    }

    fn ancestry(&self, collection: &str) -> Result<Vec<String>> {
        self.container(collection)?;
        let mut chain = vec![collection.to_string()];
        let mut current = collection;
        while let Some(split) = current.rfind('/') {
            current = &current[..split];
            chain.push(current.to_string());
        }
        if !collection.is_empty() {
            chain.push(String::new());
        }
        Ok(chain)
    }

    fn child_container(&self, collection: &str, name: &str) -> Result<Option<String>> {
        self.container(collection)?;
        let child = if collection.is_empty() {
            name.to_string()
        } else {
            format!("{collection}/{name}")
        };
        Ok(self.containers.contains_key(&child).then_some(child))
    }

    fn find_container(&self, collection: &str, name: &str) -> Result<Option<String>> {
        self.container(collection)?;
        let prefix = if collection.is_empty() {
            String::new()
        } else {
            format!("{collection}/")
        };
        for path in self.containers.keys() {
            if path.is_empty() || !path.starts_with(&prefix) || path == collection {
                continue;
            }
            let basename = path.rsplit('/').next().unwrap_or(path);
            if basename == name {
                return Ok(Some(path.clone()));
            }
        }
        Ok(None)
    }

    fn metadata_records(&self, collection: &str) -> Result<Vec<MetadataRecord>> {
        Ok(self.container(collection)?.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_container("books/meteo/XML")
            .with_document(
                "books/meteo",
                Document::pdf("d1", "interni.pdf", b"%PDF-1.7\n".to_vec()),
            )
            .with_record("books/meteo/XML", MetadataRecord::new())
    }

    #[test]
    fn test_ancestry_runs_to_root() {
        let chain = store().ancestry("books/meteo/XML").unwrap();
        assert_eq!(chain, ["books/meteo/XML", "books/meteo", "books", ""]);
    }

    #[test]
    fn test_root_ancestry_is_itself() {
        assert_eq!(store().ancestry("").unwrap(), [""]);
    }

    #[test]
    fn test_child_container() {
        let s = store();
        assert_eq!(
            s.child_container("books/meteo", "XML").unwrap(),
            Some("books/meteo/XML".to_string())
        );
        assert_eq!(s.child_container("books", "XML").unwrap(), None);
    }

    #[test]
    fn test_find_container_scoped() {
        let s = store();
        assert_eq!(
            s.find_container("books", "XML").unwrap(),
            Some("books/meteo/XML".to_string())
        );
        assert_eq!(s.find_container("books/meteo/XML", "XML").unwrap(), None);
    }

    #[test]
    fn test_unknown_collection_errors() {
        let s = store();
        assert!(s.documents("nowhere").is_err());
        assert!(s.ancestry("nowhere").is_err());
    }

    #[test]
    fn test_media_type_filter() {
        let s = MemoryStore::new()
            .with_document("c", Document::pdf("d1", "a.pdf", Vec::new()))
            .with_document(
                "c",
                Document::new("d2", "notes.txt", Vec::new(), "text/plain"),
            );
        let docs = s.documents_with_media_type("c", "application/pdf").unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].filename, "a.pdf");
    }
}
