//! Directory-backed collection store.

use super::CollectionStore;
use crate::error::{Error, Result};
use crate::model::{Document, MetadataRecord};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A collection store over a directory tree.
///
/// Directories are containers, files are documents, and the canonical
/// metadata record is a JSON file (deserializable as [`MetadataRecord`])
/// inside the metadata container. Collection ids are `/`-separated paths
/// relative to the root; `""` is the root itself. Listings are sorted by
/// name so results are deterministic across platforms.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Create a store rooted at the given directory.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, collection: &str) -> Result<PathBuf> {
        let mut path = self.root.clone();
        for segment in collection.split('/').filter(|s| !s.is_empty()) {
            if segment == "." || segment == ".." {
                return Err(Error::Store(format!(
                    "invalid collection id: {collection:?}"
                )));
            }
            path.push(segment);
        }
        if !path.is_dir() {
            return Err(Error::Store(format!("no such collection: {collection:?}")));
        }
        Ok(path)
    }

    fn relative_id(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn sorted_entries(dir: &Path) -> Result<Vec<fs::DirEntry>> {
        let mut entries: Vec<fs::DirEntry> = fs::read_dir(dir)?.collect::<std::io::Result<_>>()?;
        entries.sort_by_key(|e| e.file_name());
        Ok(entries)
    }
}

/// Declared media type for a file, from its extension.
fn media_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "json" => "application/json",
        "xml" => "application/xml",
        "epub" => "application/epub+zip",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

impl CollectionStore for FsStore {
    fn documents(&self, collection: &str) -> Result<Vec<Document>> {
        let dir = self.resolve(collection)?;
        let mut documents = Vec::new();
        for entry in Self::sorted_entries(&dir)? {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let filename = entry.file_name().to_string_lossy().into_owned();
            let content = fs::read(&path)?;
            documents.push(Document::new(
                self.relative_id(&path),
                filename,
                content,
                media_type_for(&path),
            ));
        }
        Ok(documents)
    }

    fn ancestry(&self, collection: &str) -> Result<Vec<String>> {
        self.resolve(collection)?;
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
        let dir = self.resolve(collection)?;
        if dir.join(name).is_dir() {
            let id = if collection.is_empty() {
                name.to_string()
            } else {
                format!("{collection}/{name}")
            };
            Ok(Some(id))
        } else {
            Ok(None)
        }
    }

    fn find_container(&self, collection: &str, name: &str) -> Result<Option<String>> {
        let dir = self.resolve(collection)?;
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_dir() && entry.file_name().to_string_lossy() == name {
                return Ok(Some(self.relative_id(entry.path())));
            }
        }
        Ok(None)
    }

    fn metadata_records(&self, collection: &str) -> Result<Vec<MetadataRecord>> {
        let dir = self.resolve(collection)?;
        let mut records = Vec::new();
        for entry in Self::sorted_entries(&dir)? {
            let path = entry.path();
            if !path.is_file() || media_type_for(&path) != "application/json" {
                continue;
            }
            let json = fs::read_to_string(&path)?;
            match serde_json::from_str::<MetadataRecord>(&json) {
                Ok(record) => records.push(record),
                Err(e) => {
                    log::warn!("skipping unreadable metadata record {}: {e}", path.display());
                }
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_for() {
        assert_eq!(media_type_for(Path::new("a.pdf")), "application/pdf");
        assert_eq!(media_type_for(Path::new("a.PDF")), "application/pdf");
        assert_eq!(media_type_for(Path::new("meta.json")), "application/json");
        assert_eq!(
            media_type_for(Path::new("unknown.bin")),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_invalid_collection_ids() {
        let store = FsStore::new("/nonexistent-root");
        assert!(store.resolve("../escape").is_err());
        assert!(store.resolve("a/./b").is_err());
    }
}
