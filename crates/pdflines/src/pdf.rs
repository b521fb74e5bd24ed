//! Top-level document handle that drives pages through reconstruction.

use pdflines_core::{Document, Page, PdfError, ReflowOptions};
use pdflines_parse::{LopdfBackend, PdfBackend, TextContentBackend};

/// Iterator over the reconstructed pages of a document.
///
/// Created by [`Pdf::pages_iter()`]. Each call to [`next()`](Iterator::next)
/// extracts and reconstructs one page.
pub struct PagesIter<'a, B: PdfBackend> {
    pdf: &'a Pdf<B>,
    current: usize,
    count: usize,
}

impl<B: PdfBackend> Iterator for PagesIter<'_, B> {
    type Item = Result<Page, PdfError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.count {
            return None;
        }
        let result = self.pdf.page(self.current);
        self.current += 1;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.current;
        (remaining, Some(remaining))
    }
}

impl<B: PdfBackend> ExactSizeIterator for PagesIter<'_, B> {}

/// A document opened for line reconstruction.
///
/// The backend decides where per-page text items come from: PDF content
/// streams ([`LopdfBackend`], the default) or a text-content JSON dump
/// ([`TextContentBackend`]).
///
/// # Example
///
/// ```ignore
/// let pdf = Pdf::open_file("almanac.pdf", None)?;
/// let document = pdf.document("almanac.pdf")?;
/// println!("{}", document.raw_text);
/// ```
pub struct Pdf<B: PdfBackend = LopdfBackend> {
    doc: B::Document,
    options: ReflowOptions,
}

impl Pdf {
    /// Open a PDF from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the file cannot be read or is not a valid PDF.
    #[cfg(feature = "std")]
    pub fn open_file(
        path: impl AsRef<std::path::Path>,
        options: Option<ReflowOptions>,
    ) -> Result<Self, PdfError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::open(&bytes, options)
    }

    /// Open a PDF from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::PasswordRequired`] if the PDF is encrypted, and
    /// another [`PdfError`] if the bytes are not a valid PDF.
    pub fn open(bytes: &[u8], options: Option<ReflowOptions>) -> Result<Self, PdfError> {
        Self::open_with_backend(bytes, options)
    }
}

impl Pdf<TextContentBackend> {
    /// Open a text-content JSON dump from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the file cannot be read or is not a valid dump.
    #[cfg(feature = "std")]
    pub fn open_text_content_file(
        path: impl AsRef<std::path::Path>,
        options: Option<ReflowOptions>,
    ) -> Result<Self, PdfError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::open_text_content(&bytes, options)
    }

    /// Open a text-content JSON dump from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::ParseError`] if the bytes are not a valid dump.
    pub fn open_text_content(
        bytes: &[u8],
        options: Option<ReflowOptions>,
    ) -> Result<Self, PdfError> {
        Self::open_with_backend(bytes, options)
    }
}

impl<B: PdfBackend> Pdf<B> {
    /// Open `bytes` with backend `B`.
    ///
    /// # Errors
    ///
    /// Returns whatever the backend reports, converted to [`PdfError`].
    pub fn open_with_backend(bytes: &[u8], options: Option<ReflowOptions>) -> Result<Self, PdfError> {
        let doc = B::open(bytes).map_err(Into::<PdfError>::into)?;
        Ok(Self {
            doc,
            options: options.unwrap_or_default(),
        })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        B::page_count(&self.doc)
    }

    /// The reconstruction options in effect.
    pub fn options(&self) -> &ReflowOptions {
        &self.options
    }

    /// The backend's document.
    pub fn backend_document(&self) -> &B::Document {
        &self.doc
    }

    /// Reconstruct one page by 0-based index.
    ///
    /// The returned [`Page`] carries the 1-based page number.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the index is out of range or the backend
    /// cannot extract the page's items.
    pub fn page(&self, index: usize) -> Result<Page, PdfError> {
        let page_count = self.page_count();
        let page_number = u32::try_from(index + 1)
            .ok()
            .filter(|_| index < page_count)
            .ok_or(PdfError::PageOutOfRange { index, page_count })?;

        let items = B::page_items(&self.doc, index).map_err(Into::<PdfError>::into)?;
        let page = Page::from_items(page_number, &items, &self.options);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            page = page_number,
            items = items.len(),
            lines = page.lines.len(),
            "reconstructed page"
        );

        Ok(page)
    }

    /// Iterate over reconstructed pages in page order.
    ///
    /// # Example
    ///
    /// ```ignore
    /// for page in pdf.pages_iter() {
    ///     let page = page?;
    ///     println!("page {}: {} lines", page.page_number, page.lines.len());
    /// }
    /// ```
    pub fn pages_iter(&self) -> PagesIter<'_, B> {
        PagesIter {
            pdf: self,
            current: 0,
            count: self.page_count(),
        }
    }

    /// Reconstruct every page and build the [`Document`].
    ///
    /// Pages are processed in order. The first failing page aborts the whole
    /// document; no partial result is returned.
    ///
    /// # Errors
    ///
    /// Returns the first page's [`PdfError`].
    pub fn document(&self, source_path: impl Into<String>) -> Result<Document, PdfError> {
        let pages = self.pages_iter().collect::<Result<Vec<_>, _>>()?;
        Ok(Document::new(source_path, pages))
    }
}

#[cfg(feature = "parallel")]
impl<B: PdfBackend> Pdf<B>
where
    B::Document: Sync,
{
    /// Reconstruct all pages concurrently using rayon.
    ///
    /// The returned Vec is ordered by page index regardless of the order in
    /// which pages finish.
    pub fn pages_parallel(&self) -> Vec<Result<Page, PdfError>> {
        use rayon::prelude::*;

        (0..self.page_count())
            .into_par_iter()
            .map(|i| self.page(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dump(pages: &[&[(&str, f64, f64)]]) -> Vec<u8> {
        let pages: Vec<String> = pages
            .iter()
            .map(|items| {
                let items: Vec<String> = items
                    .iter()
                    .map(|(s, x, y)| {
                        format!(r#"{{"str": "{s}", "transform": [1, 0, 0, 1, {x}, {y}]}}"#)
                    })
                    .collect();
                format!(r#"{{"items": [{}]}}"#, items.join(","))
            })
            .collect();
        format!(r#"{{"pages": [{}]}}"#, pages.join(",")).into_bytes()
    }

    #[test]
    fn document_from_text_content() {
        let bytes = dump(&[
            &[("1", 50.0, 100.0), ("Lot", 10.0, 100.0)],
            &[("Line2", 0.0, 50.0), ("Line1", 0.0, 100.0)],
        ]);
        let pdf = Pdf::open_text_content(&bytes, None).unwrap();
        assert_eq!(pdf.page_count(), 2);
        let doc = pdf.document("/tmp/x.json").unwrap();
        assert_eq!(doc.source_path, "/tmp/x.json");
        assert_eq!(doc.pages[0].lines, vec!["Lot 1"]);
        assert_eq!(doc.pages[1].page_number, 2);
        assert_eq!(doc.raw_text, "Lot 1\n\n---\n\nLine1\nLine2");
    }

    #[test]
    fn page_out_of_range() {
        let pdf = Pdf::open_text_content(&dump(&[&[]]), None).unwrap();
        assert_eq!(
            pdf.page(1).unwrap_err(),
            PdfError::PageOutOfRange {
                index: 1,
                page_count: 1
            }
        );
    }

    #[test]
    fn options_are_applied() {
        let bytes = dump(&[&[("a", 0.0, 100.0), ("b", 10.0, 97.0)]]);
        let default = Pdf::open_text_content(&bytes, None).unwrap();
        assert_eq!(default.options().y_tolerance, 2.0);
        assert_eq!(default.page(0).unwrap().lines, vec!["a", "b"]);

        let loose =
            Pdf::open_text_content(&bytes, Some(ReflowOptions { y_tolerance: 3.0 })).unwrap();
        assert_eq!(loose.page(0).unwrap().lines, vec!["a b"]);
    }

    #[test]
    fn pages_iter_is_exact_size() {
        let pdf = Pdf::open_text_content(&dump(&[&[], &[], &[]]), None).unwrap();
        let mut iter = pdf.pages_iter();
        assert_eq!(iter.len(), 3);
        iter.next();
        assert_eq!(iter.len(), 2);
    }

    #[test]
    fn empty_dump_gives_empty_document() {
        let pdf = Pdf::open_text_content(br#"{"pages": []}"#, None).unwrap();
        let doc = pdf.document("empty.json").unwrap();
        assert_eq!(doc.page_count(), 0);
        assert_eq!(doc.raw_text, "");
    }

    #[test]
    fn invalid_pdf_is_a_parse_error() {
        let err = Pdf::open(b"%PDF-garbage", None).err().unwrap();
        assert!(matches!(err, PdfError::ParseError(_)));
    }
}
