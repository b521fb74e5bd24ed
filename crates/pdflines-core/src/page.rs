use crate::cluster::cluster_fragments;
use crate::fragment::{RawItem, filter_fragments, sort_fragments};

/// Default vertical tolerance between a line's anchor and a candidate fragment.
pub const DEFAULT_Y_TOLERANCE: f64 = 2.0;

/// Options for line reconstruction.
#[derive(Debug, Clone, PartialEq)]
pub struct ReflowOptions {
    /// Maximum vertical distance (in position units) between a line's anchor
    /// and a fragment for the fragment to join that line. Inclusive.
    pub y_tolerance: f64,
}

impl Default for ReflowOptions {
    fn default() -> Self {
        Self {
            y_tolerance: DEFAULT_Y_TOLERANCE,
        }
    }
}

/// One reconstructed page: its 1-based number and its lines, top-to-bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Page {
    /// 1-based page number.
    pub page_number: u32,
    /// Assembled lines in reading order.
    pub lines: Vec<String>,
}

impl Page {
    /// Wrap already-assembled lines.
    pub fn new(page_number: u32, lines: Vec<String>) -> Self {
        debug_assert!(page_number >= 1, "page numbers are 1-based");
        Self { page_number, lines }
    }

    /// Reconstruct a page from the raw items of one extraction call.
    ///
    /// Runs filter, sort, cluster and assemble. Lines that come out empty
    /// are dropped.
    pub fn from_items(page_number: u32, items: &[RawItem], options: &ReflowOptions) -> Self {
        let mut fragments = filter_fragments(items);
        sort_fragments(&mut fragments);
        let lines = cluster_fragments(fragments, options.y_tolerance)
            .iter()
            .map(|cluster| cluster.assemble())
            .filter(|line| !line.is_empty())
            .collect();
        Self::new(page_number, lines)
    }

    /// Whether the page produced no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
