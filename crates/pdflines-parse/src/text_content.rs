//! Text-content JSON backend.
//!
//! Reads a per-page dump of positioned text items, shaped like
//!
//! ```json
//! {"pages": [{"items": [{"str": "Sun", "transform": [1, 0, 0, 1, 10, 700]}]}]}
//! ```
//!
//! Items are passed through as unvalidated [`RawItem`]s: a non-string `str`
//! yields no content and a non-array `transform` yields no transform, so the
//! reconstruction pipeline decides what to drop.

use serde::Deserialize;
use serde_json::Value;

use pdflines_core::{PdfError, RawItem};

use crate::backend::PdfBackend;
use crate::error::BackendError;

#[derive(Debug, Deserialize)]
struct Dump {
    #[serde(default)]
    pages: Vec<DumpPage>,
}

#[derive(Debug, Deserialize)]
struct DumpPage {
    #[serde(default)]
    items: Vec<DumpItem>,
}

#[derive(Debug, Deserialize)]
struct DumpItem {
    #[serde(default)]
    str: Value,
    #[serde(default)]
    transform: Value,
}

impl From<DumpItem> for RawItem {
    fn from(item: DumpItem) -> Self {
        let content = match item.str {
            Value::String(s) => Some(s),
            _ => None,
        };
        let transform = match item.transform {
            Value::Array(values) => Some(values.iter().map(component).collect()),
            _ => None,
        };
        RawItem { content, transform }
    }
}

/// A number, or a string that parses as one.
fn component(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A loaded text-content dump.
#[derive(Debug, Clone, Default)]
pub struct TextContentDocument {
    pages: Vec<Vec<RawItem>>,
}

impl TextContentDocument {
    /// Wrap already-collected per-page items.
    pub fn from_pages(pages: Vec<Vec<RawItem>>) -> Self {
        Self { pages }
    }
}

/// Backend over text-content JSON dumps.
pub struct TextContentBackend;

impl PdfBackend for TextContentBackend {
    type Document = TextContentDocument;
    type Error = BackendError;

    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error> {
        let dump: Dump = serde_json::from_slice(bytes)?;
        let pages: Vec<Vec<RawItem>> = dump
            .pages
            .into_iter()
            .map(|page| page.items.into_iter().map(RawItem::from).collect())
            .collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(pages = pages.len(), "opened text-content dump");

        Ok(TextContentDocument { pages })
    }

    fn page_count(doc: &Self::Document) -> usize {
        doc.pages.len()
    }

    fn page_items(doc: &Self::Document, index: usize) -> Result<Vec<RawItem>, Self::Error> {
        doc.pages.get(index).cloned().ok_or_else(|| {
            BackendError::Core(PdfError::PageOutOfRange {
                index,
                page_count: doc.pages.len(),
            })
        })
    }
}
