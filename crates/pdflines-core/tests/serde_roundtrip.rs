//! Serde serialization tests for the persisted document shape.

#![cfg(feature = "serde")]

use pdflines_core::*;

/// Helper: serialize to JSON string, deserialize back, assert equality.
fn roundtrip<T>(value: &T)
where
    T: serde::Serialize + serde::de::DeserializeOwned + PartialEq + std::fmt::Debug,
{
    let json = serde_json::to_string(value).expect("serialize failed");
    let restored: T = serde_json::from_str(&json).expect("deserialize failed");
    assert_eq!(*value, restored, "round-trip mismatch for JSON: {json}");
}

#[test]
fn test_serde_document_field_names() {
    let doc = Document::new(
        "/navigation/pdfs/almanac.pdf",
        vec![Page::new(1, vec!["Lot 1".to_string()])],
    );
    let value = serde_json::to_value(&doc).unwrap();
    assert_eq!(value["sourcePath"], "/navigation/pdfs/almanac.pdf");
    assert_eq!(value["pages"][0]["pageNumber"], 1);
    assert_eq!(value["pages"][0]["lines"][0], "Lot 1");
    assert_eq!(value["rawText"], "Lot 1");
    assert!(value.get("source_path").is_none());
}

#[test]
fn test_serde_document() {
    roundtrip(&Document::new(
        "a.pdf",
        vec![
            Page::new(1, vec!["A".to_string(), "B".to_string()]),
            Page::new(2, Vec::new()),
        ],
    ));
}

#[test]
fn test_serde_raw_item_with_gaps() {
    roundtrip(&RawItem {
        content: None,
        transform: Some(vec![Some(1.0), None, None, Some(1.0), Some(3.5), None]),
    });
}

#[test]
fn test_serde_ctm() {
    roundtrip(&Ctm::new(2.0, 0.0, 0.0, 3.0, 10.0, 20.0));
    roundtrip(&Ctm::identity());
}

#[test]
fn test_deserialized_document_can_be_verified() {
    let json = r#"{"sourcePath":"x","pages":[{"pageNumber":1,"lines":["A"]}],"rawText":"B"}"#;
    let doc: Document = serde_json::from_str(json).unwrap();
    assert!(!doc.verify_raw_text());
}
