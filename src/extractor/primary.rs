//! Primary extraction strategy.
//!
//! Finds the node holding the article, serialises it into a normalised HTML
//! fragment without boilerplate, and reads metadata from the same page.

use dom_query::{Document, Selection};
use tracing::debug;

use super::{ExtractedContent, MIN_PRIMARY_LENGTH};
use crate::dom;
use crate::link_density::{link_density, link_density_test, link_density_test_tables};
use crate::metadata;
use crate::patterns::{
    is_boilerplate, ARTICLE_BODY_SELECTOR, ARTICLE_SELECTOR, CONTENT_MARKER, MAIN_SELECTOR,
    WHITESPACE_NORMALIZE,
};

/// Minimum heuristic score for a candidate node to be trusted.
const MIN_NODE_SCORE: i64 = 1000;

/// Minimum share of the body text the heuristic winner must cover.
const MIN_COVERAGE: f64 = 0.3;

/// Elements copied into the output fragment.
const KEPT_TAGS: &[&str] = &[
    "p", "div", "section", "article", "main", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote",
    "pre", "code", "strong", "em", "b", "i", "a", "ul", "ol", "li", "dl", "dt", "dd", "table",
    "thead", "tbody", "tfoot", "tr", "td", "th", "caption",
];

/// Elements skipped together with their content.
const DROPPED_TAGS: &[&str] = &[
    "nav", "aside", "script", "style", "noscript", "iframe", "svg", "ins", "form", "button",
    "select", "input", "textarea", "template", "object", "embed", "canvas", "img", "picture",
    "video", "audio", "head",
];

const TABLE_PARTS: &[&str] = &[
    "table", "thead", "tbody", "tfoot", "tr", "td", "th", "caption", "colgroup", "col",
];

/// Run the primary strategy over a pre-cleaned document.
///
/// Yields `None` when the extracted body has fewer than
/// [`MIN_PRIMARY_LENGTH`] characters of text.
#[must_use]
pub fn extract(doc: &Document, url: Option<&str>) -> Option<ExtractedContent> {
    let body = match find_main_content_node(doc) {
        Some(node) => {
            debug!(tag = %dom::tag_name(&node).unwrap_or_default(), "primary: content node found");
            extract_filtered_html(&node)
        }
        None => {
            debug!("primary: no content node, using body");
            extract_filtered_html(&doc.select("body"))
        }
    };

    let length = dom::stripped_len(&body);
    if length < MIN_PRIMARY_LENGTH {
        debug!(length, minimum = MIN_PRIMARY_LENGTH, "primary: body too short");
        return None;
    }

    let meta = metadata::extract_metadata(doc);
    let date = meta.date_string();
    let title = meta.title.or_else(|| heading_title(doc)).unwrap_or_default();

    debug!(length, title = %title, "primary: accepted");

    Some(ExtractedContent {
        title,
        body,
        author: meta.author,
        published_date: date,
        source_url: url.map(str::to_string),
    })
}

/// First `<h1>`, then `<title>`, trimmed.
fn heading_title(doc: &Document) -> Option<String> {
    ["h1", "title"].iter().find_map(|tag| {
        let sel = doc.select(tag);
        let node = sel.nodes().first()?;
        Some(node.text().trim().to_string())
    })
}

// =============================================================================
// Content node selection
// =============================================================================

/// Find the node holding the main content.
///
/// Explicit content markers win, then article-like and main-like
/// containers, then the best scoring block.
fn find_main_content_node(doc: &Document) -> Option<Selection<'_>> {
    let body = doc.select("body");
    if body.length() == 0 {
        return None;
    }

    if let Some(content) = find_content_marker(&body) {
        return Some(content);
    }

    for selector in [ARTICLE_SELECTOR, MAIN_SELECTOR] {
        if let Some(node) = largest_by_text(&doc.select(selector)) {
            return Some(node);
        }
    }

    find_heuristic_content_node(doc)
}

/// First element carrying an explicit article-body marker.
fn find_content_marker<'a>(body: &Selection<'a>) -> Option<Selection<'a>> {
    let has_text = |sel: &Selection| !clean_text(&dom::text_content(sel)).is_empty();

    let explicit = body.select(ARTICLE_BODY_SELECTOR);
    if let Some(node) = explicit
        .nodes()
        .iter()
        .map(|n| Selection::from(*n))
        .find(|sel| has_text(sel))
    {
        return Some(node);
    }

    let candidates = body.select("[class], [id]");
    candidates
        .nodes()
        .iter()
        .map(|n| Selection::from(*n))
        .find(|sel| {
            let marked = sel.attr("class").is_some_and(|c| CONTENT_MARKER.is_match(&c))
                || sel.attr("id").is_some_and(|i| CONTENT_MARKER.is_match(&i));
            marked && has_text(sel)
        })
}

/// Matched element with the most text, ignoring empty ones.
fn largest_by_text<'a>(matches: &Selection<'a>) -> Option<Selection<'a>> {
    matches
        .nodes()
        .iter()
        .map(|n| {
            let sel = Selection::from(*n);
            let len = clean_text(&dom::text_content(&sel)).chars().count();
            (sel, len)
        })
        .filter(|(_, len)| *len > 0)
        .max_by_key(|(_, len)| *len)
        .map(|(sel, _)| sel)
}

#[allow(clippy::cast_precision_loss)]
fn find_heuristic_content_node(doc: &Document) -> Option<Selection<'_>> {
    let body = doc.select("body");
    let body_cleaned = clean_text(&dom::text_content(&body));
    let body_text_len = to_i64(body_cleaned.len());

    let mut best_score: i64 = 0;
    let mut best: Option<Selection> = None;

    // Short pages may have no wrapper at all
    if body_text_len > 0 && body_text_len <= 500 {
        best_score = score_content_node(&body, &body_cleaned, body_text_len, 0);
        best = Some(body.clone());
    }

    for node in doc.select("div, section, article, main").nodes() {
        let el = Selection::from(*node);

        if el.attr("class").is_some_and(|c| is_boilerplate(&c))
            || el.attr("id").is_some_and(|i| is_boilerplate(&i))
        {
            continue;
        }

        let cleaned = clean_text(&dom::text_content(&el));
        let text_len = to_i64(cleaned.len());
        if text_len == 0 {
            continue;
        }

        let mut depth: i64 = 0;
        let mut current = el.parent();
        while current.length() > 0 {
            if dom::tag_name(&current).is_some_and(|t| t == "body") {
                break;
            }
            depth = depth.saturating_add(1);
            current = current.parent();
        }

        let score = score_content_node(&el, &cleaned, text_len, depth);
        if score > best_score {
            best_score = score;
            best = Some(el);
        }
    }

    if best_score < MIN_NODE_SCORE {
        return None;
    }

    // A winner covering a small share of the page is one sibling among many
    let best = best?;
    let best_len = clean_text(&dom::text_content(&best)).len();
    let coverage = if body_text_len > 0 {
        (best_len as f64) / (body_text_len as f64)
    } else {
        1.0
    };

    if coverage < MIN_COVERAGE {
        debug!(coverage, "primary: heuristic winner rejected");
        None
    } else {
        Some(best)
    }
}

/// Score a candidate by text volume, structure and link density.
fn score_content_node(el: &Selection, cleaned_text: &str, text_len: i64, depth: i64) -> i64 {
    let paragraphs = el.select("p");
    let substantive_p_count = to_i64(
        paragraphs
            .nodes()
            .iter()
            .filter(|n| clean_text(&n.text()).len() >= 100)
            .count(),
    );

    let p_count = to_i64(paragraphs.length());
    let a_count = to_i64(el.select("a").length());
    let h_count = to_i64(el.select("h1, h2, h3, h4, h5, h6").length());

    let effective_text_len = text_len.min(8000);
    let effective_sentence_count = count_sentences(cleaned_text).min(effective_text_len / 50);

    let mut score = effective_text_len;
    score = score.saturating_add(p_count.saturating_mul(200));
    score = score.saturating_add(h_count.saturating_mul(100));
    score = score.saturating_add(substantive_p_count.saturating_mul(300));
    score = score.saturating_add(effective_sentence_count.saturating_mul(50));
    score = score.saturating_sub(a_count.saturating_mul(50));
    score = score.saturating_add(depth.saturating_mul(10));

    if link_density(el) > 0.5 {
        score /= 2;
    }

    score
}

fn count_sentences(text: &str) -> i64 {
    let mut count: i64 = 0;
    let mut prev_term = false;

    for ch in text.chars() {
        let is_term = matches!(ch, '.' | '!' | '?');
        if is_term && !prev_term {
            count = count.saturating_add(1);
        }
        prev_term = is_term;
    }

    count
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn clean_text(s: &str) -> String {
    WHITESPACE_NORMALIZE.replace_all(s.trim(), " ").into_owned()
}

// =============================================================================
// Fragment serialisation
// =============================================================================

/// Serialise a node's children into a boilerplate-free HTML fragment.
fn extract_filtered_html(root: &Selection) -> String {
    let mut out = String::new();
    push_filtered_html_children(root, &mut out, false, false);
    out.trim().to_string()
}

#[allow(clippy::too_many_lines)]
fn push_filtered_html_children(
    root: &Selection,
    out: &mut String,
    inside_layout_table: bool,
    inside_pre: bool,
) {
    let Some(root_node) = root.nodes().first() else {
        return;
    };

    for child_node in root_node.children() {
        if child_node.is_text() {
            out.push_str(&escape_html(&child_node.text()));
            continue;
        }
        if !child_node.is_element() {
            continue;
        }

        let el = Selection::from(child_node);
        let tag = dom::tag_name(&el).unwrap_or_default();

        if DROPPED_TAGS.contains(&tag.as_str()) {
            continue;
        }
        if el.attr("hidden").is_some() || el.attr("aria-hidden").is_some_and(|v| &*v == "true") {
            continue;
        }

        if !inside_pre {
            if el.attr("class").is_some_and(|c| is_boilerplate(&c))
                || el.attr("id").is_some_and(|i| is_boilerplate(&i))
            {
                continue;
            }
            if matches!(tag.as_str(), "p" | "ul" | "ol" | "dl" | "div" | "section")
                && link_density_test(&el)
            {
                continue;
            }
        }

        // Layout tables are unwrapped; only their cell content is kept
        if TABLE_PARTS.contains(&tag.as_str())
            && (inside_layout_table || (tag == "table" && is_layout_table(&el)))
        {
            push_filtered_html_children(&el, out, true, inside_pre);
            if matches!(tag.as_str(), "td" | "th" | "tr") {
                out.push('\n');
            }
            continue;
        }

        if tag == "table" && link_density_test_tables(&el) {
            continue;
        }

        if KEPT_TAGS.contains(&tag.as_str()) {
            out.push('<');
            out.push_str(&tag);
            push_kept_attributes(&el, &tag, out);
            out.push('>');

            push_filtered_html_children(&el, out, inside_layout_table, inside_pre || tag == "pre");

            out.push_str("</");
            out.push_str(&tag);
            out.push('>');
        } else if tag == "br" {
            out.push_str("<br>");
        } else if tag == "hr" {
            out.push_str("<hr>");
        } else {
            push_filtered_html_children(&el, out, inside_layout_table, inside_pre);
        }
    }
}

fn push_kept_attributes(el: &Selection, tag: &str, out: &mut String) {
    let names: &[&str] = match tag {
        "a" => &["href", "title"],
        "td" | "th" => &["colspan", "rowspan", "align"],
        "code" | "pre" => &["class"],
        "ol" => &["start"],
        _ => &[],
    };

    for name in names {
        if let Some(value) = el.attr(name) {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_html(&value));
            out.push('"');
        }
    }
}

/// Tables used for page layout rather than data.
fn is_layout_table(table: &Selection) -> bool {
    if table
        .attr("role")
        .is_some_and(|role| role.eq_ignore_ascii_case("presentation"))
    {
        return true;
    }

    table.select("tr").length() <= 1 || table.select("td, th").length() <= 1
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
