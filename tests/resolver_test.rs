//! Integration tests for metadata resolution over the store seam.

use preflight::{
    AuditOptions, Document, MemoryStore, MetadataRecord, MetadataResolver, MonthTable,
};

fn record_titled(title: &str) -> MetadataRecord {
    MetadataRecord {
        title: Some(title.into()),
        ..Default::default()
    }
}

fn resolver<'a>(store: &'a MemoryStore, options: &'a AuditOptions) -> MetadataResolver<'a> {
    MetadataResolver::new(store, &MonthTable, options)
}

#[test]
fn test_direct_child_of_collection_wins() {
    let store = MemoryStore::new()
        .with_record("books/meteo/XML", record_titled("here"))
        .with_record("XML", record_titled("root"));
    let options = AuditOptions::default();
    let found = resolver(&store, &options).locate("books/meteo").unwrap();
    assert_eq!(found.unwrap().title.as_deref(), Some("here"));
}

#[test]
fn test_walks_up_to_ancestor() {
    let store = MemoryStore::new()
        .with_container("books/meteo")
        .with_record("XML", record_titled("root"));
    let options = AuditOptions::default();
    let found = resolver(&store, &options).locate("books/meteo").unwrap();
    assert_eq!(found.unwrap().title.as_deref(), Some("root"));
}

#[test]
fn test_scoped_descendant_search_fallback() {
    // No ancestor has a direct "XML" child, but a sibling subtree of the
    // first ancestor does.
    let store = MemoryStore::new()
        .with_container("books/meteo/interni")
        .with_record("books/meteo/export/XML", record_titled("nested"));
    let options = AuditOptions::default();
    let found = resolver(&store, &options)
        .locate("books/meteo/interni")
        .unwrap();
    assert_eq!(found.unwrap().title.as_deref(), Some("nested"));
}

#[test]
fn test_nearest_ancestor_direct_child_beats_deeper_match() {
    let store = MemoryStore::new()
        .with_record("books/meteo/XML", record_titled("direct"))
        .with_record("books/meteo/sub/deeper/XML", record_titled("deep"));
    let options = AuditOptions::default();
    let found = resolver(&store, &options).locate("books/meteo").unwrap();
    assert_eq!(found.unwrap().title.as_deref(), Some("direct"));
}

#[test]
fn test_no_container_anywhere_is_not_found() {
    let store = MemoryStore::new().with_container("books/meteo");
    let options = AuditOptions::default();
    assert!(resolver(&store, &options)
        .locate("books/meteo")
        .unwrap()
        .is_none());
}

#[test]
fn test_empty_container_is_not_found() {
    let store = MemoryStore::new().with_container("books/meteo/XML");
    let options = AuditOptions::default();
    assert!(resolver(&store, &options)
        .locate("books/meteo")
        .unwrap()
        .is_none());
}

#[test]
fn test_duplicate_records_select_first_in_listing_order() {
    let store = MemoryStore::new()
        .with_record("books/meteo/XML", record_titled("first"))
        .with_record("books/meteo/XML", record_titled("second"));
    let options = AuditOptions::default();
    let found = resolver(&store, &options).locate("books/meteo").unwrap();
    assert_eq!(found.unwrap().title.as_deref(), Some("first"));
}

#[test]
fn test_located_record_is_enriched() {
    let record = MetadataRecord {
        date_published: Some("2024-03-15".into()),
        date_printed: Some("2024-11-02".into()),
        ..Default::default()
    };
    let store = MemoryStore::new().with_record("book/XML", record);
    let options = AuditOptions::default();
    let found = resolver(&store, &options).locate("book").unwrap().unwrap();
    assert_eq!(
        found.derived.get("date_published__month").map(String::as_str),
        Some("Marzo")
    );
    assert_eq!(
        found.derived.get("date_published__year").map(String::as_str),
        Some("2024")
    );
    assert_eq!(
        found.derived.get("date_printed__month").map(String::as_str),
        Some("Novembre")
    );
    assert_eq!(
        found.derived.get("date_printed__year").map(String::as_str),
        Some("2024")
    );
}

#[test]
fn test_custom_container_name() {
    let store = MemoryStore::new().with_record("book/metadata", record_titled("custom"));
    let options = AuditOptions::new().with_metadata_container("metadata");
    let found = resolver(&store, &options).locate("book").unwrap();
    assert_eq!(found.unwrap().title.as_deref(), Some("custom"));
}

#[test]
fn test_metadata_container_is_searched_from_collection_itself() {
    // The walk starts at the collection, not its parent.
    let store = MemoryStore::new().with_record("book/XML", record_titled("own"));
    let options = AuditOptions::default();
    let found = resolver(&store, &options).locate("book").unwrap();
    assert_eq!(found.unwrap().title.as_deref(), Some("own"));

    // A PDF collection holding documents still resolves through itself.
    let store = MemoryStore::new()
        .with_document("book", Document::pdf("d1", "interni.pdf", b"%PDF-1.7".to_vec()))
        .with_record("book/XML", record_titled("own"));
    let found = resolver(&store, &options).locate("book").unwrap();
    assert!(found.is_some());
}
