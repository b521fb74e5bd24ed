//! pdflines: rebuild reading-order lines and pages from positioned text.
//!
//! This is the public API facade of the workspace. It re-exports the data
//! types and algorithms of pdflines-core and drives an extraction backend
//! from pdflines-parse through them.
//!
//! # Architecture
//!
//! - **pdflines-core**: fragments, clustering, pages, documents, normalization
//! - **pdflines-parse**: extraction backends (PDF content streams, text-content JSON)
//! - **pdflines** (this crate): the [`Pdf`] handle that ties them together
//!
//! # Example
//!
//! ```ignore
//! use pdflines::Pdf;
//!
//! let pdf = Pdf::open_file("almanac.pdf", None)?;
//! let document = pdf.document("almanac.pdf")?;
//! for page in &document.pages {
//!     println!("page {}: {} lines", page.page_number, page.lines.len());
//! }
//! ```

mod pdf;

pub use pdf::{PagesIter, Pdf};

pub use pdflines_core;
pub use pdflines_parse;

pub use pdflines_core::{
    DEFAULT_PREVIEW_LINES, DEFAULT_Y_TOLERANCE, Document, PAGE_SEPARATOR, Page, PdfError, RawItem,
    ReflowOptions, normalize_text, raw_text,
};
pub use pdflines_parse::{LopdfBackend, PdfBackend, TextContentBackend};
