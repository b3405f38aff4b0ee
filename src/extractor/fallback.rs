//! Fallback extraction strategy.
//!
//! Runs the Readability algorithm from `dom_smoothie` over the pre-cleaned
//! markup. Any failure inside the algorithm, including a panic, is reported
//! as "no result".

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use super::ExtractedContent;
use crate::dom;

/// Run the fallback strategy.
///
/// Yields `None` when the algorithm fails or its fragment holds no text.
/// Author and date are never supplied.
#[must_use]
pub fn extract(html: &str, url: Option<&str>) -> Option<ExtractedContent> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| readability(html, url)));

    let (title, body) = match outcome {
        Ok(Some(article)) => article,
        Ok(None) => return None,
        Err(_) => {
            warn!("fallback: readability panicked");
            return None;
        }
    };

    if dom::stripped_text(&body).is_empty() {
        debug!("fallback: no text in readability output");
        return None;
    }

    debug!(length = body.len(), "fallback: accepted");

    Some(ExtractedContent {
        title: title.trim().to_string(),
        body,
        author: None,
        published_date: None,
        source_url: None,
    })
}

/// Title and content fragment produced by Readability.
#[cfg(feature = "readability")]
fn readability(html: &str, url: Option<&str>) -> Option<(String, String)> {
    use dom_smoothie::Readability;

    // A base URL that does not parse would fail the whole run
    let base = url.filter(|u| url::Url::parse(u).is_ok());

    let mut reader = match Readability::new(html, base, None) {
        Ok(reader) => reader,
        Err(e) => {
            debug!(error = %e, "fallback: readability rejected document");
            return None;
        }
    };

    match reader.parse() {
        Ok(article) => Some((article.title.to_string(), article.content.to_string())),
        Err(e) => {
            debug!(error = %e, "fallback: readability failed");
            None
        }
    }
}

#[cfg(not(feature = "readability"))]
fn readability(_html: &str, _url: Option<&str>) -> Option<(String, String)> {
    debug!("fallback: readability feature disabled");
    None
}
