//! An ATS document opened for table extraction.

use std::path::Path;

use atsmmi_core::{Document, MmiError, Page, PageOptions};
use atsmmi_parse::{LopdfBackend, LopdfDocument, PagePrimitives, PdfBackend};
use tracing::debug;

/// A PDF document opened for table extraction.
///
/// # Example
///
/// ```ignore
/// let doc = AtsDocument::open_file("GAP_ATS.pdf", None)?;
/// let page = doc.page(0)?;
/// for row in page.rows() {
///     println!("{:?}", row.contents());
/// }
/// ```
pub struct AtsDocument {
    doc: LopdfDocument,
    options: PageOptions,
}

impl std::fmt::Debug for AtsDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtsDocument")
            .field("page_count", &self.page_count())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl AtsDocument {
    /// Open a document from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`MmiError::Io`] if the file cannot be read, or
    /// [`MmiError::Extraction`] if it is not a readable PDF.
    pub fn open_file(
        path: impl AsRef<Path>,
        options: Option<PageOptions>,
    ) -> Result<Self, MmiError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::open(&bytes, options)
    }

    /// Open a document from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`MmiError::Extraction`] if the bytes are not a readable,
    /// unencrypted PDF.
    pub fn open(bytes: &[u8], options: Option<PageOptions>) -> Result<Self, MmiError> {
        let doc = LopdfBackend::open(bytes).map_err(MmiError::from)?;
        Ok(Self {
            doc,
            options: options.unwrap_or_default(),
        })
    }

    pub fn page_count(&self) -> usize {
        LopdfBackend::page_count(&self.doc)
    }

    pub fn options(&self) -> &PageOptions {
        &self.options
    }

    /// Extract a page by 0-based index and reconstruct its table rows.
    ///
    /// Non-fatal content warnings are logged at debug level.
    ///
    /// # Errors
    ///
    /// Returns [`MmiError::PageOutOfRange`] for a missing page,
    /// [`MmiError::Extraction`] if its content cannot be read and
    /// [`MmiError::StructuralMismatch`] if its tables are inconsistent.
    pub fn page(&self, index: usize) -> Result<Page, MmiError> {
        let primitives = self.primitives(index)?;
        for warning in &primitives.warnings {
            debug!(%warning, "content warning");
        }

        let page = Page::build(index, &primitives.rects, &primitives.texts, &self.options)?;
        debug!(page = index, rows = page.rows().len(), "page processed");
        Ok(page)
    }

    /// Raw primitives of a page, with warnings tagged by page index.
    fn primitives(&self, index: usize) -> Result<PagePrimitives, MmiError> {
        let lopdf_page = LopdfBackend::get_page(&self.doc, index).map_err(MmiError::from)?;
        let mut primitives = PagePrimitives::new();
        LopdfBackend::interpret_page(&self.doc, &lopdf_page, &mut primitives)
            .map_err(MmiError::from)?;
        for warning in &mut primitives.warnings {
            if warning.page.is_none() {
                warning.page = Some(index);
            }
        }
        Ok(primitives)
    }

    /// Extract the given pages, in the given order, into a [`Document`].
    ///
    /// # Errors
    ///
    /// Returns the first error met by [`AtsDocument::page`].
    pub fn document(&self, pages: &[usize]) -> Result<Document, MmiError> {
        let pages = pages
            .iter()
            .map(|&index| self.page(index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Document::from_pages(pages))
    }
}
