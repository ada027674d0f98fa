//! lopdf-based PDF parsing backend.
//!
//! Implements [`PdfBackend`] using the [lopdf](https://crates.io/crates/lopdf)
//! crate. This is the backend used by the `atsmmi` facade.

use atsmmi_core::MmiError;

use crate::backend::PdfBackend;
use crate::error::BackendError;
use crate::handler::ContentHandler;
use crate::interpreter::interpret_content;

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    inner: lopdf::Document,
    /// Page object ids in page order.
    page_ids: Vec<lopdf::ObjectId>,
}

impl LopdfDocument {
    /// Access the underlying lopdf document.
    pub fn inner(&self) -> &lopdf::Document {
        &self.inner
    }
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

/// A page within a [`LopdfDocument`].
#[derive(Debug, Clone, Copy)]
pub struct LopdfPage {
    pub object_id: lopdf::ObjectId,
    /// 0-based page index.
    pub index: usize,
}

/// The lopdf-based PDF backend.
///
/// ```ignore
/// use atsmmi_parse::{LopdfBackend, PagePrimitives, PdfBackend};
///
/// let doc = LopdfBackend::open(pdf_bytes)?;
/// let page = LopdfBackend::get_page(&doc, 0)?;
/// let mut primitives = PagePrimitives::new();
/// LopdfBackend::interpret_page(&doc, &page, &mut primitives)?;
/// ```
pub struct LopdfBackend;

impl PdfBackend for LopdfBackend {
    type Document = LopdfDocument;
    type Page = LopdfPage;
    type Error = BackendError;

    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error> {
        let inner = lopdf::Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;

        if inner.is_encrypted() {
            return Err(BackendError::Core(MmiError::Extraction(
                "encrypted documents are not supported".to_string(),
            )));
        }

        // get_pages is keyed by 1-based page number, so values come out in order.
        let page_ids: Vec<lopdf::ObjectId> = inner.get_pages().values().copied().collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(pages = page_ids.len(), "opened document");

        Ok(LopdfDocument { inner, page_ids })
    }

    fn page_count(doc: &Self::Document) -> usize {
        doc.page_ids.len()
    }

    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error> {
        let object_id = doc.page_ids.get(index).copied().ok_or(BackendError::Core(
            MmiError::PageOutOfRange {
                page: index,
                page_count: doc.page_ids.len(),
            },
        ))?;
        Ok(LopdfPage { object_id, index })
    }

    fn interpret_page(
        doc: &Self::Document,
        page: &Self::Page,
        handler: &mut dyn ContentHandler,
    ) -> Result<(), Self::Error> {
        let inner = &doc.inner;
        let page_dict = inner
            .get_object(page.object_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        let content = get_page_content_bytes(inner, page_dict)?;
        let resources = get_page_resources(inner, page.object_id)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(page = page.index, bytes = content.len(), "interpreting page");

        interpret_content(inner, &content, resources, handler)
    }
}

/// Look up a key on the page, walking up the page tree through `/Parent`
/// when the page itself does not carry it.
fn resolve_inherited<'a>(
    doc: &'a lopdf::Document,
    page_id: lopdf::ObjectId,
    key: &[u8],
) -> Result<Option<&'a lopdf::Object>, BackendError> {
    let mut current_id = page_id;
    loop {
        let dict = doc
            .get_object(current_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }

        match dict.get(b"Parent") {
            Ok(parent) => {
                current_id = parent
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
}

/// Follow an indirect reference, leaving direct objects (and dangling
/// references) as they are.
pub(crate) fn resolve_ref<'a>(
    doc: &'a lopdf::Document,
    obj: &'a lopdf::Object,
) -> &'a lopdf::Object {
    match obj {
        lopdf::Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Stream contents, decompressed when the stream has a `/Filter`.
pub(crate) fn decode_stream(stream: &lopdf::Stream) -> Result<Vec<u8>, BackendError> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| BackendError::Parse(format!("failed to decompress stream: {e}")))
    } else {
        Ok(stream.content.clone())
    }
}

/// The page's `/Contents`: a single stream or an array of streams, which
/// are joined with a space so operators never merge across boundaries.
fn get_page_content_bytes(
    doc: &lopdf::Document,
    page_dict: &lopdf::Dictionary,
) -> Result<Vec<u8>, BackendError> {
    let Ok(contents) = page_dict.get(b"Contents") else {
        return Ok(Vec::new());
    };

    match resolve_ref(doc, contents) {
        lopdf::Object::Stream(stream) => decode_stream(stream),
        lopdf::Object::Array(items) => {
            let mut content = Vec::new();
            for item in items {
                let stream = resolve_ref(doc, item).as_stream().map_err(|e| {
                    BackendError::Parse(format!("/Contents array item is not a stream: {e}"))
                })?;
                let bytes = decode_stream(stream)?;
                if !content.is_empty() {
                    content.push(b' ');
                }
                content.extend_from_slice(&bytes);
            }
            Ok(content)
        }
        _ => Err(BackendError::Parse(
            "/Contents is not a stream or array".to_string(),
        )),
    }
}

/// The page's resource dictionary, possibly inherited. Pages without any
/// resources get an empty dictionary.
fn get_page_resources(
    doc: &lopdf::Document,
    page_id: lopdf::ObjectId,
) -> Result<&lopdf::Dictionary, BackendError> {
    static EMPTY: std::sync::LazyLock<lopdf::Dictionary> =
        std::sync::LazyLock::new(lopdf::Dictionary::new);

    match resolve_inherited(doc, page_id, b"Resources")? {
        Some(obj) => resolve_ref(doc, obj)
            .as_dict()
            .map_err(|_| BackendError::Parse("/Resources is not a dictionary".to_string())),
        None => Ok(&EMPTY),
    }
}
