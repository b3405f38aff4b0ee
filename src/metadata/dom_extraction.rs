//! DOM-based metadata extraction.
//!
//! Fills fields the meta tags left empty by searching the document body
//! with selectors and heuristics.

use dom_query::{Document, Selection};
use regex::Regex;
use std::sync::LazyLock;

use super::meta_tags::{parse_meta_date, validate_metadata_name};
use super::Metadata;
use crate::dom;
use crate::etree;
use crate::patterns::{AUTHOR_SELECTOR, DATE_SELECTOR, TITLE_SEPARATOR};

/// Regex pattern for email addresses
#[allow(clippy::expect_used)]
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid regex"));

/// Regex pattern for Twitter handles
#[allow(clippy::expect_used)]
static TWITTER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\w+").expect("valid regex"));

/// Regex pattern for "and X more" patterns
#[allow(clippy::expect_used)]
static MORE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+and\s+\d+\s+more.*$").expect("valid regex"));

/// Byline prefixes removed before validating a name
#[allow(clippy::expect_used)]
static BYLINE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:written\s+by|posted\s+by|by)[:\s]+").expect("valid regex"));

/// Extract the title from `<title>`, removing a site-name suffix or prefix.
///
/// When the title splits on a separator, the longest part is taken if it is
/// substantial; otherwise the whole title is kept.
#[must_use]
pub fn examine_title_element(doc: &Document) -> Option<String> {
    let title_elem = doc.select("title");
    let title = title_elem.nodes().first()?.text().trim().to_string();
    if title.is_empty() {
        return None;
    }

    let parts: Vec<&str> = TITLE_SEPARATOR.split(&title).collect();
    if parts.len() > 1 {
        let main_part = parts.iter().map(|p| p.trim()).max_by_key(|p| p.chars().count());
        if let Some(part) = main_part {
            if part.chars().count() > 10 {
                return Some(part.to_string());
            }
        }
    }

    Some(title)
}

/// Fill a missing title from the `<title>` element.
#[must_use]
pub fn extract_dom_title(doc: &Document, original: Metadata) -> Metadata {
    let mut result = original;
    if result.title.is_none() {
        result.title = examine_title_element(doc);
    }
    result
}

/// Fill a missing author from byline markup.
#[must_use]
pub fn extract_dom_author(doc: &Document, original: Metadata) -> Metadata {
    let mut result = original;

    if result.author.is_some() {
        return result;
    }

    for node in doc.select(AUTHOR_SELECTOR).nodes() {
        let elem = Selection::from(*node);

        // itemprop=author often wraps a name element
        let text = match elem.select("[itemprop='name']").nodes().first() {
            Some(name_node) => etree::iter_text(&Selection::from(*name_node), " "),
            None => etree::iter_text(&elem, " "),
        };

        if let Some(author) = normalize_author(&text) {
            if validate_metadata_name(&author) {
                result.author = Some(author);
                return result;
            }
        }
    }

    result
}

/// Normalize an author string taken from page text.
///
/// Collapses whitespace and removes byline prefixes, e-mail addresses,
/// social handles and "and N more" suffixes.
pub(crate) fn normalize_author(name: &str) -> Option<String> {
    let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
    let name = BYLINE_PREFIX.replace(&name, "");
    let name = EMAIL_PATTERN.replace_all(&name, "");
    let name = TWITTER_PATTERN.replace_all(&name, "");
    let name = MORE_PATTERN.replace(&name, "");
    let name = name.trim().trim_end_matches([',', '|']).trim();

    if name.chars().count() < 2 {
        None
    } else {
        Some(name.to_string())
    }
}

/// Fill a missing date from `<time>` elements and dated markup.
#[must_use]
pub fn extract_dom_date(doc: &Document, original: Metadata) -> Metadata {
    let mut result = original;

    if result.date.is_some() {
        return result;
    }

    for node in doc.select("time[datetime]").nodes() {
        let el = Selection::from(*node);
        if let Some(date) = dom::get_attribute(&el, "datetime").and_then(|v| parse_meta_date(&v))
        {
            result.date = Some(date);
            return result;
        }
    }

    for node in doc.select(DATE_SELECTOR).nodes().iter().take(5) {
        let el = Selection::from(*node);

        let date = dom::get_attribute(&el, "datetime")
            .or_else(|| dom::get_attribute(&el, "content"))
            .and_then(|v| parse_meta_date(&v))
            .or_else(|| {
                let text = dom::text_content(&el);
                let text = text.trim();
                if text.is_empty() || text.len() >= 100 {
                    None
                } else {
                    parse_meta_date(text)
                }
            });

        if date.is_some() {
            result.date = date;
            return result;
        }
    }

    result
}
