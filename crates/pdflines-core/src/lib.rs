//! pdflines-core: Backend-independent data types and algorithms.
//!
//! This crate provides the foundational types ([`TextFragment`], [`LineCluster`],
//! [`Page`], [`Document`]) and the reading-order reconstruction pipeline used by
//! pdflines:
//!
//! 1. [`filter_fragments`] drops items with blank content or no position.
//! 2. [`sort_fragments`] orders fragments top-to-bottom, then left-to-right.
//! 3. [`cluster_fragments`] groups sorted fragments into lines around a fixed anchor.
//! 4. [`LineCluster::assemble`] joins a cluster into one line string.
//! 5. [`Page::from_items`] runs the steps above for one page.
//! 6. [`raw_text`] joins and normalizes all pages into one text blob.

pub mod cluster;
pub mod document;
pub mod error;
pub mod fragment;
pub mod geometry;
pub mod normalize;
pub mod page;

pub use cluster::{LineCluster, cluster_fragments};
pub use document::{DEFAULT_PREVIEW_LINES, Document};
pub use error::PdfError;
pub use fragment::{RawItem, TextFragment, filter_fragments, sort_fragments};
pub use geometry::Ctm;
pub use normalize::{PAGE_SEPARATOR, join_pages, normalize_text, raw_text};
pub use page::{DEFAULT_Y_TOLERANCE, Page, ReflowOptions};
