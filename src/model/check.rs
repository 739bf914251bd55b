//! Page-scoped template checks and their results.

use crate::error::{Error, Result};
use crate::template::Template;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sentinel page value addressing the last page only, never a range.
pub const LAST_PAGE: i32 = -1;

/// A check to run against a PDF: a page number and a template string
/// whose `{m.<field>}` references are resolved against the metadata
/// record before being searched for in the extracted page text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    /// One-based page to extract, or [`LAST_PAGE`] for the last page.
    pub page: i32,

    /// Template string, e.g. `"ISBN: {m.isbn}"`.
    pub target: String,
}

impl Check {
    /// Create a new check.
    pub fn new(page: i32, target: impl Into<String>) -> Self {
        Self {
            page,
            target: target.into(),
        }
    }

    /// Validate this check definition: page addressing and template
    /// references must be well-formed at setup time.
    pub fn validate(&self) -> Result<()> {
        if self.page < 1 && self.page != LAST_PAGE {
            return Err(Error::Configuration(format!(
                "check {:?}: page must be >= 1 or {LAST_PAGE} (last page), got {}",
                self.target, self.page
            )));
        }
        Template::parse(&self.target)?.validate_fields()
    }
}

/// An ordered set of checks.
///
/// Order is preserved through evaluation; it only affects report
/// readability, since checks are independent of one another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckSet {
    /// The checks, in evaluation order.
    pub checks: Vec<Check>,
}

impl CheckSet {
    /// Create an empty check set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a check set from a list of checks.
    pub fn from_checks(checks: Vec<Check>) -> Self {
        Self { checks }
    }

    /// Load a check set from a JSON array of `{"page": .., "target": ..}`
    /// objects.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a check set from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// A typical frontmatter-and-colophon check set.
    ///
    /// Ships as a starting point for new deployments; production runs load
    /// their own JSON definitions.
    pub fn example() -> Self {
        Self::from_checks(vec![
            Check::new(1, "{m.collection}"),
            Check::new(3, "{m.authors}"),
            Check::new(3, "{m.title}"),
            Check::new(3, "{m.subtitle}"),
            Check::new(
                4,
                "Prima edizione in {m.collection} {m.date_published__month} {m.date_published__year}",
            ),
            Check::new(4, "ISBN: {m.isbn}"),
            Check::new(
                LAST_PAGE,
                "Finito di stampare nel mese di {m.date_printed__month} {m.date_printed__year}",
            ),
            Check::new(LAST_PAGE, "da {m.typography}"),
        ])
    }

    /// Validate every check definition. Fails on the first defective one;
    /// a defective check is a setup-time problem, not a document problem.
    pub fn validate(&self) -> Result<()> {
        for check in &self.checks {
            check.validate()?;
        }
        Ok(())
    }

    /// Number of checks in the set.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Whether the set contains no checks.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

/// The result of one check against one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Filename of the audited document.
    pub document: String,

    /// Page the check was scoped to.
    pub page: i32,

    /// The template as configured.
    pub target: String,

    /// The target after field substitution.
    pub resolved: String,

    /// Whether the resolved target was found on the page.
    pub good: bool,

    /// Non-empty iff a referenced field was empty or absent.
    pub warning: String,
}

impl CheckResult {
    /// Human-readable page label ("4" or "last page").
    pub fn page_label(&self) -> String {
        if self.page == LAST_PAGE {
            "last page".to_string()
        } else {
            format!("page {}", self.page)
        }
    }
}

impl std::fmt::Display for CheckResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.warning.is_empty() {
            write!(f, "{} - ", self.warning.replace('\n', "; "))?;
        }
        if self.good {
            write!(
                f,
                "{}: found {:?} on {} (searched {:?})",
                self.document,
                self.resolved,
                self.page_label(),
                self.target
            )
        } else {
            write!(
                f,
                "{}: no {:?} on {} (searched {:?})",
                self.document,
                self.resolved,
                self.page_label(),
                self.target
            )
        }
    }
}
