//! Main content extraction.
//!
//! # Module Structure
//!
//! - `preprocess`: removal of non-content subtrees before any strategy runs
//! - `primary`: content-node selection, fragment serialisation and metadata
//! - `fallback`: Readability over the pre-cleaned markup
//!
//! The strategies are tried in order. The fallback only runs when the
//! primary strategy yields nothing, and whichever result survives is
//! validated before it leaves this module.

pub mod fallback;
pub mod preprocess;
pub mod primary;

use tracing::debug;

use crate::dom;
use crate::error::{Error, ExtractionFailure, Result};

pub use preprocess::preprocess_html;

/// Minimum stripped text length for the primary strategy to accept its body.
pub const MIN_PRIMARY_LENGTH: usize = 100;

/// Minimum stripped text length of any accepted body.
pub const MIN_CONTENT_LENGTH: usize = 3;

/// Article content isolated from a page.
///
/// Built once per extraction and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    title: String,
    body: String,
    author: Option<String>,
    published_date: Option<String>,
    source_url: Option<String>,
}

impl ExtractedContent {
    /// Create content with a title and HTML body and no metadata.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            author: None,
            published_date: None,
            source_url: None,
        }
    }

    /// Same content with the author set.
    #[must_use]
    pub fn with_author(self, author: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            ..self
        }
    }

    /// Same content with the publication date (`YYYY-MM-DD`) set.
    #[must_use]
    pub fn with_published_date(self, date: impl Into<String>) -> Self {
        Self {
            published_date: Some(date.into()),
            ..self
        }
    }

    /// Same content with the source URL set.
    #[must_use]
    pub fn with_source_url(self, url: impl Into<String>) -> Self {
        Self {
            source_url: Some(url.into()),
            ..self
        }
    }

    /// Article title; empty when the page had none.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Article body as an HTML fragment.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    #[must_use]
    pub fn published_date(&self) -> Option<&str> {
        self.published_date.as_deref()
    }

    #[must_use]
    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }
}

/// Extract the article from raw page markup.
///
/// # Errors
///
/// Returns [`Error::Extraction`] when neither strategy finds content, or when
/// the surviving body has no text or fewer than [`MIN_CONTENT_LENGTH`]
/// characters of it.
pub fn extract_content(html: &str, url: &str) -> Result<ExtractedContent> {
    let doc = preprocess_html(html);

    let result = primary::extract(&doc, Some(url)).or_else(|| {
        debug!(url, "primary strategy found nothing, trying fallback");
        fallback::extract(&doc.html(), Some(url))
    });

    finish(result, url)
}

/// Validate the surviving strategy result and backfill its source URL.
fn finish(result: Option<ExtractedContent>, url: &str) -> Result<ExtractedContent> {
    let content = result.ok_or_else(|| Error::extraction(ExtractionFailure::NoResult, url))?;

    let length = dom::stripped_len(&content.body);
    if length == 0 {
        return Err(Error::extraction(ExtractionFailure::Empty, url));
    }
    if length < MIN_CONTENT_LENGTH {
        return Err(Error::extraction(
            ExtractionFailure::TooShort {
                length,
                minimum: MIN_CONTENT_LENGTH,
            },
            url,
        ));
    }

    if content.source_url.is_some() {
        Ok(content)
    } else {
        Ok(content.with_source_url(url))
    }
}
