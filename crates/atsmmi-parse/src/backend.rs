//! PDF parsing backend trait.
//!
//! [`PdfBackend`] abstracts opening a document and feeding each page's
//! content to a [`ContentHandler`], so the extraction pipeline does not
//! depend on a particular PDF library.

use atsmmi_core::MmiError;

use crate::handler::ContentHandler;

/// Trait abstracting PDF document access.
///
/// # Usage
///
/// ```ignore
/// let doc = MyBackend::open(pdf_bytes)?;
/// for index in 0..MyBackend::page_count(&doc) {
///     let page = MyBackend::get_page(&doc, index)?;
///     let mut primitives = PagePrimitives::new();
///     MyBackend::interpret_page(&doc, &page, &mut primitives)?;
/// }
/// ```
pub trait PdfBackend {
    /// The parsed document.
    type Document;

    /// A page within a document.
    type Page;

    /// Backend-specific error type, convertible to [`MmiError`].
    type Error: std::error::Error + Into<MmiError>;

    /// Parse PDF bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a readable, unencrypted PDF.
    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error>;

    fn page_count(doc: &Self::Document) -> usize;

    /// Access a page by 0-based index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error>;

    /// Interpret the page's content, reporting rectangles, text runs and
    /// warnings to `handler`.
    ///
    /// # Errors
    ///
    /// Returns an error if the page content cannot be read or tokenized.
    fn interpret_page(
        doc: &Self::Document,
        page: &Self::Page,
        handler: &mut dyn ContentHandler,
    ) -> Result<(), Self::Error>;
}
