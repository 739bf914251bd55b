//! The canonical bibliographic metadata record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Suffix of the derived localized-month field (`date_printed__month`).
pub const DERIVED_MONTH_SUFFIX: &str = "__month";

/// Suffix of the derived four-digit-year field (`date_printed__year`).
pub const DERIVED_YEAR_SUFFIX: &str = "__year";

/// Prefix marking date-valued fields eligible for enrichment.
pub const DATE_FIELD_PREFIX: &str = "date_";

/// Field names resolvable from check templates, in declaration order.
pub const FIELD_NAMES: &[&str] = &[
    "isbn",
    "title",
    "subtitle",
    "collection",
    "collection_issn",
    "authors",
    "illustrators",
    "translators",
    "curators",
    "biographies",
    "edition",
    "original_language",
    "original_title",
    "pages",
    "classification",
    "abstract",
    "publication_city",
    "date_published",
    "price",
    "price_with_tax",
    "date_printed",
    "typography",
];

/// The bibliographic metadata record a publication is audited against.
///
/// Date-valued fields carry the `date_` prefix and hold ISO calendar dates
/// (`"2024-03-15"`). Enrichment attaches two derived values per date field,
/// under the field name plus [`DERIVED_MONTH_SUFFIX`] and
/// [`DERIVED_YEAR_SUFFIX`]. Derived values are recomputed on every
/// resolution and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataRecord {
    /// ISBN-13, hyphens allowed.
    pub isbn: Option<String>,

    /// Title of the publication.
    pub title: Option<String>,

    /// Subtitle.
    pub subtitle: Option<String>,

    /// Title of the collection (series) the publication belongs to.
    pub collection: Option<String>,

    /// ISSN of the collection.
    pub collection_issn: Option<String>,

    /// Authors.
    pub authors: Vec<String>,

    /// Illustrators.
    pub illustrators: Vec<String>,

    /// Translators.
    pub translators: Vec<String>,

    /// Editorial curators.
    pub curators: Vec<String>,

    /// Contributor biographies.
    pub biographies: Vec<String>,

    /// Edition number.
    pub edition: Option<u32>,

    /// Language of the original work, for translations.
    pub original_language: Option<String>,

    /// Title of the original work, for translations.
    pub original_title: Option<String>,

    /// Page count.
    pub pages: Option<u32>,

    /// Subject classification keys (Thema).
    pub classification: Vec<String>,

    /// Back-cover abstract.
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,

    /// City of publication.
    pub publication_city: Option<String>,

    /// Publication date, ISO calendar format.
    pub date_published: Option<String>,

    /// Cover price, without tax.
    pub price: Option<String>,

    /// Cover price, tax included.
    pub price_with_tax: Option<String>,

    /// Print date, ISO calendar format.
    pub date_printed: Option<String>,

    /// Name of the typography printing the publication.
    pub typography: Option<String>,

    /// Derived fields attached by enrichment (`<date field>__month`,
    /// `<date field>__year`). Recomputed on every resolution call.
    #[serde(skip)]
    pub derived: BTreeMap<String, String>,
}

impl MetadataRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is resolvable from a check template: either a base
    /// field or a derived month/year form of a date field.
    ///
    /// Check sets are validated against this at setup time so that a
    /// reference to a non-existent field is caught before any audit runs.
    pub fn is_template_field(name: &str) -> bool {
        if FIELD_NAMES.contains(&name) {
            return true;
        }
        for suffix in [DERIVED_MONTH_SUFFIX, DERIVED_YEAR_SUFFIX] {
            if let Some(base) = name.strip_suffix(suffix) {
                return base.starts_with(DATE_FIELD_PREFIX) && FIELD_NAMES.contains(&base);
            }
        }
        false
    }

    /// Resolve a template field by name.
    ///
    /// Returns `None` for an unknown name, `Some(None)` for a known field
    /// whose value is empty or absent, and `Some(Some(value))` otherwise.
    /// List fields are joined with `", "`. Derived names resolve through
    /// the enrichment map; before enrichment (or for an absent date) they
    /// count as known-but-empty, never as unknown.
    pub fn field(&self, name: &str) -> Option<Option<String>> {
        if let Some(value) = self.derived.get(name) {
            return Some(non_empty(value.clone()));
        }
        if !FIELD_NAMES.contains(&name) {
            if Self::is_template_field(name) {
                // Valid derived name, not enriched or date absent.
                return Some(None);
            }
            return None;
        }
        let value = match name {
            "isbn" => self.isbn.clone(),
            "title" => self.title.clone(),
            "subtitle" => self.subtitle.clone(),
            "collection" => self.collection.clone(),
            "collection_issn" => self.collection_issn.clone(),
            "authors" => join(&self.authors),
            "illustrators" => join(&self.illustrators),
            "translators" => join(&self.translators),
            "curators" => join(&self.curators),
            "biographies" => join(&self.biographies),
            "edition" => self.edition.map(|n| n.to_string()),
            "original_language" => self.original_language.clone(),
            "original_title" => self.original_title.clone(),
            "pages" => self.pages.map(|n| n.to_string()),
            "classification" => join(&self.classification),
            "abstract" => self.abstract_text.clone(),
            "publication_city" => self.publication_city.clone(),
            "date_published" => self.date_published.clone(),
            "price" => self.price.clone(),
            "price_with_tax" => self.price_with_tax.clone(),
            "date_printed" => self.date_printed.clone(),
            "typography" => self.typography.clone(),
            _ => unreachable!("name checked against FIELD_NAMES"),
        };
        Some(value.and_then(non_empty))
    }

    /// The date-valued fields eligible for enrichment, in field order.
    pub fn date_fields(&self) -> [(&'static str, Option<&str>); 2] {
        [
            ("date_published", self.date_published.as_deref()),
            ("date_printed", self.date_printed.as_deref()),
        ]
    }

    /// Advisory consistency validation: ISBN-13 shape and checksum,
    /// 978/979 prefix, even page count.
    ///
    /// Problems never block an audit; they are surfaced for the operator.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if let Some(raw) = &self.isbn {
            let isbn: String = raw.chars().filter(|c| *c != '-' && *c != ' ').collect();
            if isbn.len() != 13 || !isbn.chars().all(|c| c.is_ascii_digit()) {
                problems.push(format!("ISBN {raw:?} is not 13 digits"));
            } else {
                if !isbn.starts_with("978") && !isbn.starts_with("979") {
                    problems.push(format!("ISBN {raw:?} does not start with 978 or 979"));
                }
                let total: u32 = isbn
                    .chars()
                    .enumerate()
                    .map(|(i, c)| {
                        let digit = c.to_digit(10).unwrap_or(0);
                        if i % 2 == 0 {
                            digit
                        } else {
                            digit * 3
                        }
                    })
                    .sum();
                if total % 10 != 0 {
                    problems.push(format!("ISBN {raw:?} fails the ISBN-13 checksum"));
                }
            }
        }

        if let Some(pages) = self.pages {
            if pages % 2 != 0 {
                problems.push(format!("page count {pages} is odd"));
            }
        }

        problems
    }
}

fn join(values: &[String]) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MetadataRecord {
        MetadataRecord {
            isbn: Some("979-12-80068-56-9".into()),
            title: Some("Raccontare il meteo".into()),
            authors: vec!["Ada Rossi".into(), "Bruno Bianchi".into()],
            pages: Some(128),
            date_published: Some("2024-03-15".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_field_lookup() {
        let m = sample();
        assert_eq!(m.field("isbn"), Some(Some("979-12-80068-56-9".into())));
        assert_eq!(m.field("authors"), Some(Some("Ada Rossi, Bruno Bianchi".into())));
        assert_eq!(m.field("pages"), Some(Some("128".into())));
        // Known but empty.
        assert_eq!(m.field("subtitle"), Some(None));
        assert_eq!(m.field("translators"), Some(None));
        // Unknown.
        assert_eq!(m.field("publisher"), None);
    }

    #[test]
    fn test_derived_names_are_known_before_enrichment() {
        let m = sample();
        assert_eq!(m.field("date_published__month"), Some(None));
        assert_eq!(m.field("date_printed__year"), Some(None));
    }

    #[test]
    fn test_derived_lookup_after_enrichment() {
        let mut m = sample();
        m.derived.insert("date_published__month".into(), "Marzo".into());
        assert_eq!(m.field("date_published__month"), Some(Some("Marzo".into())));
    }

    #[test]
    fn test_is_template_field() {
        assert!(MetadataRecord::is_template_field("title"));
        assert!(MetadataRecord::is_template_field("date_printed__month"));
        assert!(MetadataRecord::is_template_field("date_published__year"));
        assert!(!MetadataRecord::is_template_field("title__month"));
        assert!(!MetadataRecord::is_template_field("date_invented__month"));
        assert!(!MetadataRecord::is_template_field("publisher"));
    }

    #[test]
    fn test_empty_string_counts_as_absent() {
        let m = MetadataRecord {
            subtitle: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(m.field("subtitle"), Some(None));
    }

    #[test]
    fn test_validate_accepts_publisher_isbn() {
        assert!(sample().validate().is_empty());
    }

    #[test]
    fn test_validate_flags_bad_checksum() {
        let m = MetadataRecord {
            isbn: Some("9791280068568".into()),
            ..Default::default()
        };
        let problems = m.validate();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("checksum"));
    }

    #[test]
    fn test_validate_flags_odd_pages() {
        let m = MetadataRecord {
            pages: Some(127),
            ..Default::default()
        };
        assert_eq!(m.validate(), vec!["page count 127 is odd".to_string()]);
    }

    #[test]
    fn test_derived_fields_not_serialized() {
        let mut m = sample();
        m.derived.insert("date_published__month".into(), "Marzo".into());
        let json = serde_json::to_string(&m).unwrap();
        assert!(!json.contains("derived"));
        assert!(!json.contains("Marzo"));
    }

    #[test]
    fn test_partial_deserialization() {
        let m: MetadataRecord = serde_json::from_str(r#"{"isbn": "9791280068569"}"#).unwrap();
        assert_eq!(m.isbn.as_deref(), Some("9791280068569"));
        assert!(m.title.is_none());
        assert!(m.authors.is_empty());
    }
}
