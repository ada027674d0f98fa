//! atsmmi-parse: page primitive extraction for atsmmi.
//!
//! Reads PDF documents with lopdf and interprets each page's content stream
//! into the rectangles and positioned text runs that `atsmmi-core` turns
//! into table rows.

pub mod backend;
pub mod cmap;
pub mod error;
pub mod handler;
pub mod interpreter;
pub mod lopdf_backend;
pub mod state;
pub mod tokenizer;

pub use backend::PdfBackend;
pub use cmap::CMap;
pub use error::BackendError;
pub use handler::{ContentHandler, PagePrimitives, RectEvent, TextEvent};
pub use interpreter::interpret_content;
pub use lopdf_backend::{LopdfBackend, LopdfDocument, LopdfPage};
pub use tokenizer::{Operand, Operator, tokenize};
