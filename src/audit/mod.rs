//! The preflight engine: runs both auditors over a collection and
//! aggregates their outcomes into one report.

mod images;
mod text;

pub use images::{parse_line, parse_listing, ImageAuditor};
pub use text::{contains_target, TextAuditor};

use crate::error::Result;
use crate::locale::{Localizer, MonthTable};
use crate::locator::DocumentLocator;
use crate::model::{AuditReport, CheckSet, Document, DocumentReport, MetadataRecord};
use crate::options::AuditOptions;
use crate::resolver::MetadataResolver;
use crate::store::CollectionStore;
use crate::tool::ToolRunner;
use rayon::prelude::*;

static DEFAULT_LOCALIZER: MonthTable = MonthTable;

/// The preflight engine.
///
/// One invocation resolves the metadata record fresh, enumerates the PDF
/// candidates of a collection, runs the image-resolution and text-presence
/// auditors on each, and groups the outcomes per document without altering
/// them. A single document's failure never aborts the batch.
///
/// # Example
///
/// ```no_run
/// use preflight::{CheckSet, FsStore, Preflight};
///
/// fn main() -> preflight::Result<()> {
///     let store = FsStore::new("/srv/editorial/books/meteo");
///     let checks = CheckSet::from_file("checks.json")?;
///     let report = Preflight::new(&store).with_checks(checks).run("")?;
///     println!("{} findings", report.finding_count());
///     Ok(())
/// }
/// ```
pub struct Preflight<'a> {
    store: &'a dyn CollectionStore,
    localizer: &'a dyn Localizer,
    options: AuditOptions,
    checks: CheckSet,
}

impl<'a> Preflight<'a> {
    /// Create an engine over a store, with default options, the built-in
    /// localizer, and no checks.
    pub fn new(store: &'a dyn CollectionStore) -> Self {
        Self {
            store,
            localizer: &DEFAULT_LOCALIZER,
            options: AuditOptions::default(),
            checks: CheckSet::new(),
        }
    }

    /// Replace the localizer.
    pub fn with_localizer(mut self, localizer: &'a dyn Localizer) -> Self {
        self.localizer = localizer;
        self
    }

    /// Replace the options.
    pub fn with_options(mut self, options: AuditOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the checks evaluated by the text-presence auditor.
    pub fn with_checks(mut self, checks: CheckSet) -> Self {
        self.checks = checks;
        self
    }

    /// Run the full preflight over a collection.
    ///
    /// Check definitions are validated up front: a defective check is a
    /// setup error, raised before any document is touched. A missing
    /// metadata record disables the text checks (they have nothing to
    /// resolve against) but image audits still run. Zero eligible
    /// documents yields an empty report, a valid outcome.
    pub fn run(&self, collection: &str) -> Result<AuditReport> {
        self.checks.validate()?;

        let resolver = MetadataResolver::new(self.store, self.localizer, &self.options);
        let metadata = resolver.locate(collection)?;
        if metadata.is_none() {
            log::warn!(
                "no metadata record found for {collection:?}; text checks are skipped"
            );
        }

        let documents = DocumentLocator::new(self.store).list_candidates(collection)?;
        let runner = ToolRunner::new(self.options.tool_timeout);

        let mut report = AuditReport::new(metadata.is_some());
        report.documents = if self.options.parallel {
            documents
                .par_iter()
                .map(|doc| self.audit_document(&runner, metadata.as_ref(), doc))
                .collect()
        } else {
            documents
                .iter()
                .map(|doc| self.audit_document(&runner, metadata.as_ref(), doc))
                .collect()
        };
        Ok(report)
    }

    /// Audit one document with both auditors, catching recoverable
    /// failures so the batch continues.
    fn audit_document(
        &self,
        runner: &ToolRunner,
        metadata: Option<&MetadataRecord>,
        document: &Document,
    ) -> DocumentReport {
        let mut report = DocumentReport::new(&document.filename);

        match ImageAuditor::new(runner, &self.options).audit_document(document) {
            Ok(images) => report.images = images,
            Err(e) => {
                log::warn!("image audit failed for {}: {e}", document.filename);
                report.error = Some(e.to_string());
                return report;
            }
        }

        if let Some(metadata) = metadata {
            match TextAuditor::new(runner, &self.options).check_document(
                document,
                metadata,
                &self.checks.checks,
            ) {
                Ok(checks) => report.checks = checks,
                Err(e) => {
                    log::warn!("text checks failed for {}: {e}", document.filename);
                    report.error = Some(e.to_string());
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::Check;
    use crate::store::MemoryStore;

    #[test]
    fn test_empty_collection_yields_empty_report() {
        let store = MemoryStore::new().with_container("book");
        let report = Preflight::new(&store).run("book").unwrap();
        assert!(report.is_empty());
        assert!(report.is_clean());
        assert!(!report.metadata_found);
    }

    #[test]
    fn test_defective_checks_fail_before_any_audit() {
        let store = MemoryStore::new();
        let checks = CheckSet::from_checks(vec![Check::new(1, "{title}")]);
        let result = Preflight::new(&store).with_checks(checks).run("");
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_metadata_found_is_reported() {
        let store = MemoryStore::new()
            .with_container("book/XML")
            .with_record("book/XML", MetadataRecord::new());
        let report = Preflight::new(&store).run("book").unwrap();
        assert!(report.metadata_found);
        assert!(report.is_empty());
    }
}
