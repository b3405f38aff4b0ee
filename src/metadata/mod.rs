//! Metadata extraction.
//!
//! Title, author and publication date are read from `<meta>` tags first and
//! then from the document body for whatever is still missing.

pub mod dom_extraction;
pub mod meta_tags;

use chrono::NaiveDate;
use dom_query::Document;

pub use dom_extraction::{examine_title_element, extract_dom_author, extract_dom_date, extract_dom_title};
pub use meta_tags::{examine_meta, parse_meta_date, validate_metadata_name};

/// Article metadata found in a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Article title.
    pub title: Option<String>,
    /// Author name.
    pub author: Option<String>,
    /// Publication date.
    pub date: Option<NaiveDate>,
}

impl Metadata {
    /// Publication date rendered as `YYYY-MM-DD`.
    #[must_use]
    pub fn date_string(&self) -> Option<String> {
        self.date.map(|d| d.format("%Y-%m-%d").to_string())
    }
}

/// Extract all metadata from a document.
///
/// Sources are tried in order:
/// 1. HTML meta tags (og:, twitter:, Dublin Core, ...)
/// 2. DOM extraction (`<title>`, bylines, `<time>`)
#[must_use]
pub fn extract_metadata(doc: &Document) -> Metadata {
    let mut metadata = meta_tags::examine_meta(doc, Metadata::default());

    metadata = dom_extraction::extract_dom_title(doc, metadata);
    metadata = dom_extraction::extract_dom_author(doc, metadata);
    metadata = dom_extraction::extract_dom_date(doc, metadata);

    post_process_metadata(metadata)
}

/// Collapse whitespace and drop fields left empty.
fn post_process_metadata(metadata: Metadata) -> Metadata {
    let clean = |value: Option<String>| {
        value
            .map(|v| v.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|v| !v.is_empty())
    };

    Metadata {
        title: clean(metadata.title),
        author: clean(metadata.author),
        date: metadata.date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_metadata_meta_before_dom() {
        let html = r#"<html><head>
            <title>Page Title | Site</title>
            <meta property="og:title" content="Meta Title">
            <meta name="author" content="Meta Author">
        </head><body>
            <p class="byline">By Someone Else</p>
            <time datetime="2024-05-06">May 6</time>
        </body></html>"#;

        let metadata = extract_metadata(&Document::from(html));

        assert_eq!(metadata.title.as_deref(), Some("Meta Title"));
        assert_eq!(metadata.author.as_deref(), Some("Meta Author"));
        assert_eq!(metadata.date_string().as_deref(), Some("2024-05-06"));
    }

    #[test]
    fn test_extract_metadata_empty_page() {
        let metadata = extract_metadata(&Document::from("<html><body><p>x</p></body></html>"));
        assert_eq!(metadata, Metadata::default());
    }

    #[test]
    fn test_post_process_collapses_whitespace() {
        let metadata = post_process_metadata(Metadata {
            title: Some("  A\n   Title ".to_string()),
            author: Some("   ".to_string()),
            date: None,
        });
        assert_eq!(metadata.title.as_deref(), Some("A Title"));
        assert_eq!(metadata.author, None);
    }
}
