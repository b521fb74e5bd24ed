use crate::normalize::raw_text;
use crate::page::Page;

/// Number of raw-text lines shown in an operator preview.
pub const DEFAULT_PREVIEW_LINES: usize = 160;

/// A fully reconstructed document.
///
/// `raw_text` is derived from `pages`; [`Document::new`] computes it, so it
/// can always be reproduced by re-normalizing the pages.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Document {
    /// Identifier of the originating document. Passed through untouched.
    pub source_path: String,
    /// Pages in page-number order.
    pub pages: Vec<Page>,
    /// Normalized text of all pages, with page separators.
    pub raw_text: String,
}

impl Document {
    /// Build a document and derive its raw text.
    pub fn new(source_path: impl Into<String>, pages: Vec<Page>) -> Self {
        let raw_text = raw_text(&pages);
        Self {
            source_path: source_path.into(),
            pages,
            raw_text,
        }
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// The first `max_lines` lines of the raw text, joined with `\n`.
    pub fn preview(&self, max_lines: usize) -> String {
        self.raw_text
            .split('\n')
            .take(max_lines)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether `raw_text` still matches what normalization of `pages` yields.
    ///
    /// Always true for documents built with [`Document::new`]; useful after
    /// deserializing a document from an untrusted source.
    pub fn verify_raw_text(&self) -> bool {
        self.raw_text == raw_text(&self.pages)
    }
}
