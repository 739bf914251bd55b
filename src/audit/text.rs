//! Text-presence auditing over the text-extraction tool.

use crate::error::Result;
use crate::model::{Check, CheckResult, Document, MetadataRecord};
use crate::options::AuditOptions;
use crate::template::Template;
use crate::tool::{MaterializedDocument, ToolRunner};
use std::collections::HashMap;
use unicode_normalization::UnicodeNormalization;

/// Audits the presence of metadata-derived text on specific pages.
pub struct TextAuditor<'a> {
    runner: &'a ToolRunner,
    options: &'a AuditOptions,
}

impl<'a> TextAuditor<'a> {
    /// Create an auditor over the given runner and options.
    pub fn new(runner: &'a ToolRunner, options: &'a AuditOptions) -> Self {
        Self { runner, options }
    }

    /// Evaluate every check against a document, preserving check order.
    ///
    /// Checks are independent; a failed match never stops the remaining
    /// checks. Configuration defects in a template propagate immediately:
    /// they are setup problems, not document problems. Tool spawn failures
    /// and timeouts propagate for the engine to record per-document.
    pub fn check_document(
        &self,
        document: &Document,
        metadata: &MetadataRecord,
        checks: &[Check],
    ) -> Result<Vec<CheckResult>> {
        let materialized = self.runner.materialize(document)?;
        let mut pages: HashMap<i32, String> = HashMap::new();
        let mut results = Vec::with_capacity(checks.len());
        for check in checks {
            let template = Template::parse(&check.target)?;
            let (resolved, warning) = template.render(metadata)?;
            let text = match pages.get(&check.page) {
                Some(text) => text.clone(),
                None => {
                    let text = self.extract_page(&materialized, check.page)?;
                    pages.insert(check.page, text.clone());
                    text
                }
            };
            let good = contains_target(&text, &resolved);
            results.push(CheckResult {
                document: document.filename.clone(),
                page: check.page,
                target: check.target.clone(),
                resolved,
                good,
                warning,
            });
        }
        Ok(results)
    }

    /// Extract exactly the requested page as plain text.
    ///
    /// A page of -1 is passed straight through as `-f -1 -l -1`: the
    /// extraction tool's own from-the-end addressing selects the last page
    /// only, never a range.
    fn extract_page(&self, materialized: &MaterializedDocument, page: i32) -> Result<String> {
        let path = materialized.path().to_string_lossy().into_owned();
        let page = page.to_string();
        let output = self.runner.run(
            &self.options.text_tool,
            &[path.as_str(), "-f", page.as_str(), "-l", page.as_str(), "-"],
        )?;
        if !output.success() {
            log::warn!(
                "{} exited with {:?} for page {page}: {}",
                self.options.text_tool,
                output.status,
                output.stderr.trim()
            );
        }
        Ok(output.stdout)
    }
}

/// Substring search with a tolerant fallback.
///
/// Tries the exact resolved target first; failing that, retries with both
/// strings whitespace-normalized, case-folded, and NFC-normalized, since
/// extracted page text breaks lines freely and disagrees with operator
/// input on composed accented characters.
pub fn contains_target(text: &str, target: &str) -> bool {
    if text.contains(target) {
        return true;
    }
    normalize(text).contains(&normalize(target))
}

fn normalize(s: &str) -> String {
    s.nfc()
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(contains_target(
            "colophon\nISBN: 9791280068569\nfine",
            "ISBN: 9791280068569"
        ));
    }

    #[test]
    fn test_match_across_newline() {
        assert!(contains_target(
            "Prima edizione in\nFuori collana Marzo 2024",
            "Prima edizione in Fuori collana Marzo 2024"
        ));
    }

    #[test]
    fn test_case_folded_match() {
        assert!(contains_target("FINITO DI STAMPARE", "Finito di stampare"));
    }

    #[test]
    fn test_nfc_normalized_match() {
        // Extracted text with a combining accent vs composed input.
        assert!(contains_target("citta\u{0300} di Trieste", "citt\u{00e0} di Trieste"));
    }

    #[test]
    fn test_no_match() {
        assert!(!contains_target("pagina bianca", "ISBN: 9791280068569"));
    }

    #[test]
    fn test_collapsed_whitespace_match() {
        assert!(contains_target("da   Tipografia\n  Moderna", "da Tipografia Moderna"));
    }
}
