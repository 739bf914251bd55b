//! Document types.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Media type of PDF documents.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// PDF magic bytes.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// A document held by the collection store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Store-level identity.
    pub id: String,

    /// Original filename.
    pub filename: String,

    /// Raw binary content.
    #[serde(skip_serializing, default)]
    pub content: Vec<u8>,

    /// Declared media type (e.g. "application/pdf").
    pub media_type: String,
}

impl Document {
    /// Create a new document.
    pub fn new(
        id: impl Into<String>,
        filename: impl Into<String>,
        content: Vec<u8>,
        media_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            filename: filename.into(),
            content,
            media_type: media_type.into(),
        }
    }

    /// Create a PDF document.
    pub fn pdf(id: impl Into<String>, filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self::new(id, filename, content, PDF_MEDIA_TYPE)
    }

    /// Read a PDF document from a file on disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(
            path.to_string_lossy().into_owned(),
            filename,
            content,
            PDF_MEDIA_TYPE,
        ))
    }

    /// Whether the content starts with the PDF magic bytes.
    ///
    /// The declared media type decides eligibility; this only detects
    /// mislabeled content so it can be surfaced to the operator.
    pub fn looks_like_pdf(&self) -> bool {
        self.content.starts_with(PDF_MAGIC)
    }

    /// Content size in bytes.
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_constructor() {
        let doc = Document::pdf("d1", "book.pdf", b"%PDF-1.7\n".to_vec());
        assert_eq!(doc.media_type, PDF_MEDIA_TYPE);
        assert!(doc.looks_like_pdf());
        assert_eq!(doc.size(), 9);
    }

    #[test]
    fn test_magic_mismatch() {
        let doc = Document::pdf("d2", "fake.pdf", b"<html>".to_vec());
        assert!(!doc.looks_like_pdf());
    }

    #[test]
    fn test_content_not_serialized() {
        let doc = Document::pdf("d1", "book.pdf", b"%PDF-1.7\n".to_vec());
        let json = serde_json::to_string(&doc).unwrap();
        assert!(!json.contains("content"));
    }
}
