//! Markup pre-cleaning.
//!
//! Subtrees that never hold article content are removed before either
//! extraction strategy sees the page.

use dom_query::{Document, Selection};
use tracing::debug;

use crate::dom;
use crate::etree;

/// Tags whose whole subtree is dropped before extraction.
pub const NON_CONTENT_TAGS: [&str; 7] =
    ["script", "style", "nav", "footer", "header", "aside", "noscript"];

/// Parse markup and remove non-content subtrees.
#[must_use]
pub fn preprocess_html(html: &str) -> Document {
    let doc = dom::parse(html);

    let selector = NON_CONTENT_TAGS.join(", ");
    let discarded = doc.select(&selector).nodes().to_vec();
    let count = discarded.len();

    // Children before parents so nested matches are detached first;
    // text following a removed element stays in place
    for node in discarded.into_iter().rev() {
        etree::remove(&Selection::from(node), true);
    }

    debug!(removed = count, "pre-cleaned markup");
    doc
}
