//! HTML meta tag metadata.
//!
//! Reads title, author and publication date from standard `<meta>` tags,
//! Open Graph, Twitter cards and Dublin Core.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use dom_query::{Document, Selection};

use super::Metadata;
use crate::dom;

/// Examine `<meta>` tags for metadata.
///
/// Fields already set on `original` are kept; the first usable tag wins for
/// each missing field.
#[must_use]
pub fn examine_meta(doc: &Document, original: Metadata) -> Metadata {
    let mut result = original;

    for node in doc.select("meta").nodes() {
        let meta = Selection::from(*node);

        let name = dom::get_attribute(&meta, "name")
            .or_else(|| dom::get_attribute(&meta, "property"))
            .or_else(|| dom::get_attribute(&meta, "itemprop"))
            .unwrap_or_default()
            .to_lowercase();

        let content = dom::get_attribute(&meta, "content").unwrap_or_default();
        let content = content.trim();

        if name.is_empty() || content.is_empty() {
            continue;
        }

        match name.as_str() {
            "og:title" | "twitter:title" | "dc.title" | "dcterms.title" | "sailthru.title"
            | "parsely-title" | "headline" => {
                if result.title.is_none() {
                    result.title = Some(content.to_string());
                }
            }

            "author" | "article:author" | "dc.creator" | "dcterms.creator" | "byl"
            | "sailthru.author" | "parsely-author" => {
                if result.author.is_none() && validate_metadata_name(content) {
                    result.author = Some(content.to_string());
                }
            }

            "article:published_time" | "og:article:published_time" | "article:published"
            | "article.published" | "article:created" | "article.created" | "date"
            | "dc.date" | "dc.date.issued" | "dcterms.date" | "dcterms.created"
            | "datepublished" | "sailthru.date" | "parsely-pub-date" | "pubdate"
            | "publish_date" | "publishdate" | "publish-date" => {
                if result.date.is_none() {
                    result.date = parse_meta_date(content);
                }
            }

            _ => {}
        }
    }

    result
}

/// Validate that a metadata value looks like a person's name.
///
/// Rejects URLs, e-mail addresses, JSON blobs, identifiers and values too
/// short or too long to be a name.
#[must_use]
pub fn validate_metadata_name(name: &str) -> bool {
    let name = name.trim();
    let length = name.chars().count();

    if !(2..=120).contains(&length) {
        return false;
    }

    // Long single tokens are slugs or ids
    if length > 20 && !name.contains(' ') {
        return false;
    }

    if name.starts_with("http://") || name.starts_with("https://") || name.starts_with("www.") {
        return false;
    }

    if name.contains('@') || name.contains(".com") || name.contains(".org") || name.contains(".net")
    {
        return false;
    }

    if name.starts_with('{') || name.starts_with('[') {
        return false;
    }

    if name.chars().filter(char::is_ascii_digit).count() > 3 {
        return false;
    }

    let special_count = name
        .chars()
        .filter(|c| {
            !c.is_alphanumeric() && !c.is_whitespace() && !matches!(c, '-' | '\'' | '.' | ',')
        })
        .count();

    special_count <= 2
}

/// Parse a date from a meta tag or DOM attribute.
///
/// Accepts RFC 3339 timestamps, ISO 8601 without offset and a handful of
/// common human layouts. The time of day is discarded.
#[must_use]
pub fn parse_meta_date(date_str: &str) -> Option<NaiveDate> {
    let date_str = date_str.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt.date_naive());
    }

    if let Ok(dt) = DateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.date_naive());
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, fmt) {
            return Some(dt.date());
        }
    }

    let formats = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%d/%m/%Y",
        "%m/%d/%Y",
        "%B %d, %Y", // January 15, 2024
        "%b %d, %Y", // Jan 15, 2024
        "%d %B %Y",  // 15 January 2024
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(date_str, fmt) {
            return Some(date);
        }
    }

    // Leading ISO date followed by anything else
    date_str
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}
