//! Error types for the extraction layer.
//!
//! [`BackendError`] is derived with [`thiserror`] and converts into the
//! core [`MmiError`] so callers handle a single error type.

use atsmmi_core::MmiError;
use thiserror::Error;

/// Error raised while reading a document or interpreting its pages.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Document structure could not be parsed or resolved.
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading document data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A font or its ToUnicode CMap could not be read.
    #[error("font error: {0}")]
    Font(String),

    /// Malformed content stream.
    #[error("interpreter error: {0}")]
    Interpreter(String),

    /// A core error, passed through unchanged.
    #[error(transparent)]
    Core(#[from] MmiError),
}

impl From<BackendError> for MmiError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Io(e) => MmiError::Io(e.to_string()),
            BackendError::Core(e) => e,
            other => MmiError::Extraction(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_message() {
        let err = BackendError::Parse("missing xref".to_string());
        assert_eq!(err.to_string(), "PDF parse error: missing xref");
    }

    #[test]
    fn io_error_converts_to_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: MmiError = BackendError::from(io_err).into();
        assert!(matches!(err, MmiError::Io(ref msg) if msg.contains("no such file")));
    }

    #[test]
    fn interpreter_error_becomes_extraction() {
        let err: MmiError = BackendError::Interpreter("unterminated array".to_string()).into();
        assert_eq!(
            err,
            MmiError::Extraction("interpreter error: unterminated array".to_string())
        );
    }

    #[test]
    fn core_error_passes_through() {
        let original = MmiError::PageOutOfRange {
            page: 4,
            page_count: 2,
        };
        let err: MmiError = BackendError::Core(original.clone()).into();
        assert_eq!(err, original);
    }

    #[test]
    fn backend_error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(BackendError::Font("bad cmap".to_string()));
        assert!(err.to_string().contains("bad cmap"));
    }
}
