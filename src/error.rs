//! Error types for the preflight library.

use std::io;
use thiserror::Error;

/// Result type alias for preflight operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while auditing documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading documents or materializing temp files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading from the document-collection store.
    #[error("store error: {0}")]
    Store(String),

    /// A tool output line does not match the expected shape.
    #[error("malformed tool output: {0}")]
    MalformedToolOutput(String),

    /// A check definition is defective (bad field marker, unknown field,
    /// invalid page). Raised at setup time, never absorbed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A populated date value cannot be decomposed into calendar components.
    #[error("date format error: {0}")]
    DateFormat(String),

    /// An external tool did not finish within the configured timeout.
    #[error("tool `{tool}` timed out after {seconds}s")]
    ToolTimeout {
        /// Name of the tool that was killed.
        tool: String,
        /// Configured timeout in seconds.
        seconds: u64,
    },

    /// Error decoding JSON (check sets, stored metadata records).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Configuration("field names must start with \"m.\"".into());
        assert_eq!(
            err.to_string(),
            "configuration error: field names must start with \"m.\""
        );

        let err = Error::ToolTimeout {
            tool: "pdfimages".into(),
            seconds: 30,
        };
        assert_eq!(err.to_string(), "tool `pdfimages` timed out after 30s");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
