//! Aggregated audit reports.

use super::{CheckResult, ImageAudit};
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-document grouping of both auditors' outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Filename of the audited document.
    pub document: String,

    /// Image-resolution audit outcomes, in listing order.
    pub images: Vec<ImageAudit>,

    /// Text-presence check outcomes, in check order.
    pub checks: Vec<CheckResult>,

    /// Recoverable per-document failure (tool timeout, spawn error).
    /// The batch continues past it.
    pub error: Option<String>,
}

impl DocumentReport {
    /// Create an empty report for a document.
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            images: Vec::new(),
            checks: Vec::new(),
            error: None,
        }
    }

    /// Number of images below the resolution threshold.
    pub fn bad_image_count(&self) -> usize {
        self.images.iter().filter(|a| !a.good).count()
    }

    /// Number of failed text checks.
    pub fn failed_check_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.good).count()
    }

    /// Whether the document passed everything that was audited.
    pub fn is_clean(&self) -> bool {
        self.error.is_none() && self.bad_image_count() == 0 && self.failed_check_count() == 0
    }
}

/// The aggregated report of one preflight run.
///
/// Grouping never alters individual outcomes. A run over a collection with
/// zero eligible documents yields an empty report, which is a valid result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,

    /// Whether a canonical metadata record was resolved for the run.
    /// Text checks require one; image audits run either way.
    pub metadata_found: bool,

    /// Per-document reports, in listing order.
    pub documents: Vec<DocumentReport>,
}

impl AuditReport {
    /// Create an empty report.
    pub fn new(metadata_found: bool) -> Self {
        Self {
            generated_at: Utc::now(),
            metadata_found,
            documents: Vec::new(),
        }
    }

    /// Whether no documents were audited.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Whether every audited document is clean.
    pub fn is_clean(&self) -> bool {
        self.documents.iter().all(|d| d.is_clean())
    }

    /// Total number of failed outcomes across all documents.
    pub fn finding_count(&self) -> usize {
        self.documents
            .iter()
            .map(|d| {
                d.bad_image_count() + d.failed_check_count() + usize::from(d.error.is_some())
            })
            .sum()
    }

    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
