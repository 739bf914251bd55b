//! Check-target templates: `{m.<field>}` reference parsing and rendering.

use crate::error::{Error, Result};
use crate::model::MetadataRecord;
use regex::Regex;
use std::sync::OnceLock;

/// Marker prefix every field reference must carry, as in `{m.title}`.
pub const FIELD_MARKER: &str = "m.";

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{([^{}]*)\}").unwrap())
}

/// A parsed check template.
///
/// References are resolved against a [`MetadataRecord`] at render time;
/// their names are available up front so check sets can be validated
/// before any audit runs.
#[derive(Debug, Clone)]
pub struct Template {
    raw: String,
    /// Referenced field names, marker stripped, in appearance order.
    references: Vec<String>,
}

impl Template {
    /// Parse a template string.
    ///
    /// Every `{...}` reference must carry the [`FIELD_MARKER`] prefix;
    /// a reference without it is a configuration defect, not a
    /// document-dependent condition.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut references = Vec::new();
        for captures in reference_pattern().captures_iter(raw) {
            let token = &captures[1];
            let Some(name) = token.strip_prefix(FIELD_MARKER) else {
                return Err(Error::Configuration(format!(
                    "badly defined check {raw:?}: field names must start with {FIELD_MARKER:?}, got {token:?}"
                )));
            };
            references.push(name.to_string());
        }
        Ok(Self {
            raw: raw.to_string(),
            references,
        })
    }

    /// The referenced field names, marker stripped.
    pub fn references(&self) -> &[String] {
        &self.references
    }

    /// Check that every referenced field resolves against the metadata
    /// record's accessor table.
    pub fn validate_fields(&self) -> Result<()> {
        for name in &self.references {
            if !MetadataRecord::is_template_field(name) {
                return Err(Error::Configuration(format!(
                    "check {:?} references unknown field {FIELD_MARKER}{name}",
                    self.raw
                )));
            }
        }
        Ok(())
    }

    /// Substitute all referenced values and return the resolved target
    /// together with the accumulated warning text.
    ///
    /// An empty or absent field appends a notice naming it and substitutes
    /// the empty string; evaluation proceeds on whatever literal text
    /// remains. An unknown field is a configuration error.
    pub fn render(&self, record: &MetadataRecord) -> Result<(String, String)> {
        let mut resolved = String::with_capacity(self.raw.len());
        let mut warning = String::new();
        let mut last = 0;
        for captures in reference_pattern().captures_iter(&self.raw) {
            let whole = captures.get(0).unwrap();
            let name = captures[1]
                .strip_prefix(FIELD_MARKER)
                .ok_or_else(|| {
                    Error::Configuration(format!(
                        "badly defined check {:?}: field names must start with {FIELD_MARKER:?}",
                        self.raw
                    ))
                })?
                .to_string();
            resolved.push_str(&self.raw[last..whole.start()]);
            match record.field(&name) {
                Some(Some(value)) => resolved.push_str(&value),
                Some(None) => {
                    // Missing or empty value: warn, keep evaluating.
                    warning.push_str(&format!(
                        "Empty field {FIELD_MARKER}{name}. Result is undefined."
                    ));
                }
                None => {
                    return Err(Error::Configuration(format!(
                        "check {:?} references unknown field {FIELD_MARKER}{name}",
                        self.raw
                    )));
                }
            }
            last = whole.end();
        }
        resolved.push_str(&self.raw[last..]);
        Ok((resolved, warning))
    }
}
