//! # preflight
//!
//! Print-production preflight auditing for PDF documents.
//!
//! The engine audits the PDFs of a document collection against a derived
//! bibliographic metadata record and print-quality rules before a title is
//! released for printing:
//!
//! - the **image-resolution auditor** lists every embedded image through an
//!   external listing tool and flags anything below the print threshold;
//! - the **text-presence auditor** resolves page-scoped template checks
//!   (`"ISBN: {m.isbn}"`) against the metadata record and searches the
//!   extracted page text for the result.
//!
//! ## Quick Start
//!
//! ```no_run
//! use preflight::{CheckSet, FsStore, Preflight};
//!
//! fn main() -> preflight::Result<()> {
//!     let store = FsStore::new("/srv/editorial/books/meteo");
//!     let checks = CheckSet::from_file("checks.json")?;
//!
//!     let report = Preflight::new(&store).with_checks(checks).run("")?;
//!     for doc in &report.documents {
//!         println!("{}: {} findings", doc.document, doc.bad_image_count() + doc.failed_check_count());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Design
//!
//! - **Batch robustness**: one bad document (tool timeout, broken file)
//!   is recorded on its own report entry; the batch continues.
//! - **Setup-time validation**: check sets are validated before any audit
//!   runs, so a template referencing a non-existent metadata field fails
//!   immediately instead of mid-batch.
//! - **Read-only**: the engine never mutates the store; every output is a
//!   derived, disposable report.
//! - **Pluggable storage**: collections are reached through the
//!   [`CollectionStore`] trait; a directory-backed store ships with the
//!   crate, anything hierarchical can implement it.

pub mod audit;
pub mod error;
pub mod locale;
pub mod locator;
pub mod model;
pub mod options;
pub mod resolver;
pub mod store;
pub mod template;
pub mod tool;

// Re-export commonly used types
pub use audit::{contains_target, parse_line, parse_listing, ImageAuditor, Preflight, TextAuditor};
pub use error::{Error, Result};
pub use locale::{Localizer, MonthTable};
pub use locator::DocumentLocator;
pub use model::{
    AuditReport, Check, CheckResult, CheckSet, Document, DocumentReport, ImageAudit, ImageRecord,
    MetadataRecord, LAST_PAGE, PDF_MEDIA_TYPE,
};
pub use options::AuditOptions;
pub use resolver::MetadataResolver;
pub use store::{CollectionStore, FsStore, MemoryStore};
pub use template::{Template, FIELD_MARKER};
pub use tool::{MaterializedDocument, ToolOutput, ToolRunner};

use std::path::Path;

/// Run a full preflight over a collection with default options.
///
/// # Example
///
/// ```no_run
/// use preflight::{audit_collection, CheckSet, FsStore};
///
/// let store = FsStore::new("/srv/editorial/books/meteo");
/// let report = audit_collection(&store, "", CheckSet::example()).unwrap();
/// println!("clean: {}", report.is_clean());
/// ```
pub fn audit_collection(
    store: &dyn CollectionStore,
    collection: &str,
    checks: CheckSet,
) -> Result<AuditReport> {
    Preflight::new(store).with_checks(checks).run(collection)
}

/// Run a full preflight over a directory tree with default options.
///
/// The directory is treated as the collection: its PDF files are the
/// candidates and the metadata record is looked up in an `XML`
/// subdirectory, walking upward from the root of the tree.
pub fn audit_directory<P: AsRef<Path>>(root: P, checks: CheckSet) -> Result<AuditReport> {
    let store = FsStore::new(root.as_ref());
    audit_collection(&store, "", checks)
}

/// Audit the image resolution of a single PDF file with default options.
///
/// # Example
///
/// ```no_run
/// use preflight::audit_images_file;
///
/// for audit in audit_images_file("interni.pdf").unwrap() {
///     println!("{} -> {}", audit.image, if audit.good { "ok" } else { "low" });
/// }
/// ```
pub fn audit_images_file<P: AsRef<Path>>(path: P) -> Result<Vec<ImageAudit>> {
    let options = AuditOptions::default();
    let runner = ToolRunner::new(options.tool_timeout);
    let document = Document::from_path(path)?;
    ImageAuditor::new(&runner, &options).audit_document(&document)
}
