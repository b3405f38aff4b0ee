//! Error types for web2md.
//!
//! Each pipeline stage fails with its own variant so callers can tell a
//! network problem apart from a page that had nothing worth extracting.

use std::path::PathBuf;

/// Reason an extraction attempt was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionFailure {
    /// Neither the primary nor the fallback strategy produced a result.
    #[error("failed to extract content from page")]
    NoResult,

    /// A strategy produced a body but it holds no text.
    #[error("extracted content is empty")]
    Empty,

    /// The body text is shorter than the accepted minimum.
    #[error("extracted content too short ({length} chars, min {minimum})")]
    TooShort {
        /// Measured length of the stripped body text, in characters.
        length: usize,
        /// Minimum length required.
        minimum: usize,
    },
}

/// Error type for the fetch → extract → convert pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The page could not be fetched.
    ///
    /// `status` is only set when the server answered with an HTTP error;
    /// validation, timeout and transport failures leave it empty.
    #[error("{message}")]
    Fetch {
        /// Human readable description.
        message: String,
        /// URL that was requested.
        url: String,
        /// HTTP status code, if the server was reached.
        status: Option<u16>,
    },

    /// No usable article content could be isolated from the page.
    #[error("{reason}")]
    Extraction {
        /// Why extraction was rejected.
        reason: ExtractionFailure,
        /// Source URL of the page.
        url: String,
    },

    /// Rendering the extracted fragment to Markdown failed.
    #[error("conversion failed: {0}")]
    Conversion(String),

    /// The rendered document could not be written to disk.
    #[error("failed to write {}: {source}", path.display())]
    Output {
        /// Destination that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn fetch(message: impl Into<String>, url: &str) -> Self {
        Self::Fetch {
            message: message.into(),
            url: url.to_string(),
            status: None,
        }
    }

    pub(crate) fn extraction(reason: ExtractionFailure, url: &str) -> Self {
        Self::Extraction {
            reason,
            url: url.to_string(),
        }
    }

    /// HTTP status code carried by a fetch error.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Fetch { status, .. } => *status,
            _ => None,
        }
    }

    /// URL associated with a fetch or extraction error.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Fetch { url, .. } | Self::Extraction { url, .. } => Some(url),
            _ => None,
        }
    }

    /// Process exit code the CLI uses for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Fetch { .. } => 1,
            Self::Extraction { .. } => 2,
            Self::Conversion(_) => 3,
            Self::Output { .. } => 4,
        }
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_without_status() {
        let err = Error::fetch("URL cannot be empty", "");
        assert_eq!(err.status_code(), None);
        assert_eq!(err.to_string(), "URL cannot be empty");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_fetch_error_with_status() {
        let err = Error::Fetch {
            message: "HTTP 404 error".to_string(),
            url: "https://example.com/missing".to_string(),
            status: Some(404),
        };
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.url(), Some("https://example.com/missing"));
    }

    #[test]
    fn test_too_short_message_reports_lengths() {
        let err = Error::extraction(
            ExtractionFailure::TooShort { length: 2, minimum: 3 },
            "https://example.com",
        );
        assert_eq!(err.to_string(), "extracted content too short (2 chars, min 3)");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_conversion_error_has_no_url() {
        let err = Error::Conversion("renderer panicked".to_string());
        assert_eq!(err.url(), None);
        assert_eq!(err.status_code(), None);
        assert_eq!(err.exit_code(), 3);
    }
}
