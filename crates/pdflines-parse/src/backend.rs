//! Extraction backend trait.
//!
//! Defines the [`PdfBackend`] trait that abstracts where per-page text items
//! come from. This is the only interface the reconstruction pipeline needs
//! from an extraction collaborator.

use pdflines_core::{PdfError, RawItem};

/// Trait abstracting per-page text item extraction.
///
/// # Associated Types
///
/// - `Document`: The opened source document.
/// - `Error`: Backend-specific error type, convertible to [`PdfError`].
///
/// # Usage
///
/// ```ignore
/// let doc = MyBackend::open(bytes)?;
/// for index in 0..MyBackend::page_count(&doc) {
///     let items = MyBackend::page_items(&doc, index)?;
/// }
/// ```
pub trait PdfBackend {
    /// The opened document type.
    type Document;

    /// Backend-specific error type, convertible to [`PdfError`].
    type Error: std::error::Error + Into<PdfError>;

    /// Parse raw bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a document this backend reads.
    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error>;

    /// Return the number of pages in the document.
    fn page_count(doc: &Self::Document) -> usize;

    /// Extract the raw text items of a page by 0-based index, in the order
    /// the source produced them.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or the page content
    /// cannot be read. Any error here is fatal for the whole document.
    fn page_items(doc: &Self::Document, index: usize) -> Result<Vec<RawItem>, Self::Error>;
}
