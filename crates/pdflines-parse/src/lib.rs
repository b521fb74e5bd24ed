//! pdflines-parse: extraction backends that produce raw text items per page.
//!
//! This crate implements the extraction side of pdflines. Every backend
//! implements [`PdfBackend`] and hands back unvalidated [`RawItem`]s; all
//! filtering and reading-order work happens in pdflines-core.
//!
//! - [`LopdfBackend`]: reads PDF files with lopdf and interprets the text
//!   operators of each page's content stream.
//! - [`TextContentBackend`]: reads a JSON dump of per-page text items.
//!
//! [`RawItem`]: pdflines_core::RawItem

pub mod backend;
pub mod cmap;
pub mod error;
pub mod font;
pub mod handler;
pub mod interpreter;
pub mod lopdf_backend;
pub mod text_content;
pub mod text_state;
pub mod tokenizer;

pub use backend::PdfBackend;
pub use error::BackendError;
pub use handler::{ContentHandler, TextRunEvent};
pub use lopdf_backend::{LopdfBackend, LopdfDocument};
pub use pdflines_core;
pub use text_content::{TextContentBackend, TextContentDocument};
