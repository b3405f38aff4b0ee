//! DOM helpers over `dom_query`.
//!
//! Small, named operations shared by the extractor and converter so the
//! stages read in terms of what they do to the tree.

pub use dom_query::{Document, NodeRef, Selection};
pub use tendril::StrTendril;

/// Parse an HTML string (document or fragment) into a document.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_ascii_lowercase())
}

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// All text content of the node and its descendants.
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Inner HTML of the first node in the selection.
#[inline]
#[must_use]
pub fn inner_html(sel: &Selection) -> StrTendril {
    sel.inner_html()
}

/// Plain text of an HTML fragment with markup removed.
///
/// Each text node is trimmed and the pieces are concatenated without a
/// separator, so only visible characters count towards the length.
/// `<script>` and `<style>` content is not text.
#[must_use]
pub fn stripped_text(html: &str) -> String {
    let doc = parse(html);
    let mut out = String::new();
    for root in doc.select("html").nodes() {
        collect_stripped(root, &mut out);
    }
    out
}

fn collect_stripped(node: &NodeRef, out: &mut String) {
    for child in node.children() {
        if child.is_text() {
            out.push_str(child.text().trim());
        } else if child.is_element() {
            let skip = child
                .node_name()
                .is_some_and(|name| matches!(&*name, "script" | "style" | "template"));
            if !skip {
                collect_stripped(&child, out);
            }
        }
    }
}

/// Number of characters in the stripped text of a fragment.
#[must_use]
pub fn stripped_len(html: &str) -> usize {
    stripped_text(html).chars().count()
}
