//! Canonical metadata record resolution and enrichment.

use crate::error::{Error, Result};
use crate::locale::Localizer;
use crate::model::{MetadataRecord, DERIVED_MONTH_SUFFIX, DERIVED_YEAR_SUFFIX};
use crate::options::AuditOptions;
use crate::store::CollectionStore;
use chrono::NaiveDate;

/// Locates the canonical metadata record for a collection and attaches
/// derived date fields.
pub struct MetadataResolver<'a> {
    store: &'a dyn CollectionStore,
    localizer: &'a dyn Localizer,
    options: &'a AuditOptions,
}

impl<'a> MetadataResolver<'a> {
    /// Create a resolver over the given collaborators.
    pub fn new(
        store: &'a dyn CollectionStore,
        localizer: &'a dyn Localizer,
        options: &'a AuditOptions,
    ) -> Self {
        Self {
            store,
            localizer,
            options,
        }
    }

    /// Locate and enrich the metadata record for a collection.
    ///
    /// Walks the containment ancestry upward. At each ancestor, a direct
    /// child container named as configured (default `"XML"`) wins; failing
    /// that, a scoped search within the ancestor's subtree. The walk stops
    /// at the first ancestor with a match, or at the hierarchy root.
    ///
    /// Zero records in the found container is `Ok(None)`, a non-fatal
    /// outcome the caller surfaces as an empty result. More than one
    /// record selects the first in listing order; the duplicate is logged,
    /// not failed, a deliberately lenient policy that has confused
    /// operators before.
    pub fn locate(&self, collection: &str) -> Result<Option<MetadataRecord>> {
        let Some(container) = self.find_metadata_container(collection)? else {
            return Ok(None);
        };
        let mut records = self.store.metadata_records(&container)?;
        if records.is_empty() {
            return Ok(None);
        }
        if records.len() > 1 {
            log::warn!(
                "container {container:?} holds {} metadata records; using the first",
                records.len()
            );
        }
        let mut record = records.swap_remove(0);
        self.enrich(&mut record)?;
        Ok(Some(record))
    }

    fn find_metadata_container(&self, collection: &str) -> Result<Option<String>> {
        let name = &self.options.metadata_container;
        for ancestor in self.store.ancestry(collection)? {
            if let Some(found) = self.store.child_container(&ancestor, name)? {
                return Ok(Some(found));
            }
            if let Some(found) = self.store.find_container(&ancestor, name)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// Attach derived month/year fields for every date-valued field.
    ///
    /// Derived values are recomputed from scratch on every call. An absent
    /// date leaves both derived values absent; a populated date that does
    /// not parse as an ISO calendar date is a [`Error::DateFormat`].
    pub fn enrich(&self, record: &mut MetadataRecord) -> Result<()> {
        record.derived.clear();
        let mut derived = Vec::new();
        for (name, value) in record.date_fields() {
            let Some(raw) = value else { continue };
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
                Error::DateFormat(format!("field {name} holds {raw:?}: {e}"))
            })?;
            let month = self
                .localizer
                .translate(&date.format("%B").to_string(), &self.options.language);
            derived.push((format!("{name}{DERIVED_MONTH_SUFFIX}"), month));
            derived.push((format!("{name}{DERIVED_YEAR_SUFFIX}"), date.format("%Y").to_string()));
        }
        record.derived.extend(derived);
        Ok(())
    }
}
