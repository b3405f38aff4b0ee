//! HTML fragment to Markdown document conversion.
//!
//! Fragments are rendered with `quick_html2md`. Data tables, preformatted
//! blocks and images are rendered by this module first and spliced back in
//! afterwards, so table layout, code fences and image syntax stay under this
//! crate's control.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use chrono::{DateTime, Utc};
use quick_html2md::{html_to_markdown_with_options, MarkdownOptions};
use tracing::debug;

use crate::dom::{self, NodeRef, Selection};
use crate::error::{Error, Result};
use crate::extractor::ExtractedContent;
use crate::markdown::{html_table_to_markdown, normalize_whitespace};
use crate::patterns::WHITESPACE_NORMALIZE;

/// Timestamp layout of the `extracted_at` front matter field.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Render an HTML fragment as normalised Markdown.
///
/// # Errors
///
/// Returns [`Error::Conversion`] if the renderer fails unexpectedly.
pub fn html_to_markdown(html: &str) -> Result<String> {
    let (html, blocks) = extract_blocks(html);

    let rendered = panic::catch_unwind(AssertUnwindSafe(|| {
        let options = MarkdownOptions::new()
            .include_links(true)
            .include_images(true)
            .preserve_tables(true);
        html_to_markdown_with_options(&html, &options)
    }))
    .map_err(|payload| Error::Conversion(panic_message(payload.as_ref())))?;

    let mut markdown = rendered;
    for (index, block) in blocks.iter().enumerate().rev() {
        markdown = markdown.replace(&placeholder(index), block.trim_end());
    }

    Ok(normalize_whitespace(&markdown))
}

/// Assemble the final document.
///
/// With `include_metadata`, a front matter block comes first. The title
/// heading always follows, then the rendered body when it is not empty.
///
/// # Errors
///
/// Returns [`Error::Conversion`] if the body cannot be rendered.
pub fn format_document(content: &ExtractedContent, include_metadata: bool) -> Result<String> {
    format_document_at(content, include_metadata, Utc::now())
}

/// [`format_document`] with a fixed extraction timestamp.
///
/// # Errors
///
/// Returns [`Error::Conversion`] if the body cannot be rendered.
pub fn format_document_at(
    content: &ExtractedContent,
    include_metadata: bool,
    extracted_at: DateTime<Utc>,
) -> Result<String> {
    let mut parts: Vec<String> = Vec::with_capacity(3);

    if include_metadata {
        parts.push(front_matter(content, extracted_at));
    }

    parts.push(format!("# {}", content.title()));

    if !content.body().is_empty() {
        let body = html_to_markdown(content.body())?;
        debug!(length = body.len(), "rendered body");
        if !body.is_empty() {
            parts.push(body);
        }
    }

    Ok(parts.join("\n\n"))
}

fn front_matter(content: &ExtractedContent, extracted_at: DateTime<Utc>) -> String {
    let mut lines = vec!["---".to_string(), yaml_field("title", content.title())];

    let optional = [
        ("author", content.author()),
        ("date", content.published_date()),
        ("source", content.source_url()),
    ];
    for (key, value) in optional {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            lines.push(yaml_field(key, value));
        }
    }

    let timestamp = extracted_at.format(TIMESTAMP_FORMAT).to_string();
    lines.push(yaml_field("extracted_at", &timestamp));
    lines.push("---".to_string());

    lines.join("\n")
}

/// `key: "value"` with the value escaped for a double-quoted YAML scalar.
fn yaml_field(key: &str, value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("{key}: \"{escaped}\"")
}

fn placeholder(index: usize) -> String {
    format!("WEBMDBLOCK{index}END")
}

/// Replace data tables, preformatted blocks and images with placeholders.
///
/// Returns the rewritten fragment and the Markdown of each replaced element,
/// indexed by placeholder number. Fragments with none of them are returned
/// unchanged.
fn extract_blocks(html: &str) -> (String, Vec<String>) {
    let doc = dom::parse(html);
    if doc.select("table, pre, img").length() == 0 {
        return (html.to_string(), Vec::new());
    }

    let mut blocks = Vec::new();

    // Tables first; code and images inside them collapse to cell text
    for node in outermost(&doc.select("table"), "table") {
        let table = Selection::from(node);
        let markdown = html_table_to_markdown(&table);
        if markdown.is_empty() {
            table.remove();
            continue;
        }
        table.replace_with_html(format!("<p>{}</p>", placeholder(blocks.len())));
        blocks.push(markdown);
    }

    for node in outermost(&doc.select("pre"), "pre") {
        let pre = Selection::from(node);
        let markdown = fenced_code(&pre);
        pre.replace_with_html(format!("<p>{}</p>", placeholder(blocks.len())));
        blocks.push(markdown);
    }

    for node in doc.select("img").nodes().to_vec() {
        let img = Selection::from(node);
        match image_markdown(&img) {
            Some(markdown) => {
                img.replace_with_html(placeholder(blocks.len()));
                blocks.push(markdown);
            }
            None => img.remove(),
        }
    }

    (dom::inner_html(&doc.select("body")).to_string(), blocks)
}

/// Matched nodes that have no matching ancestor.
fn outermost<'a>(matches: &Selection<'a>, tag: &str) -> Vec<NodeRef<'a>> {
    matches
        .nodes()
        .iter()
        .filter(|node| {
            !node
                .ancestors(None)
                .iter()
                .any(|a| a.node_name().is_some_and(|n| &*n == tag))
        })
        .copied()
        .collect()
}

/// Fenced code block holding the text of a `<pre>` element.
///
/// The fence grows past the longest backtick run in the code, and a
/// `language-*` or `lang-*` class becomes the info string.
fn fenced_code(pre: &Selection) -> String {
    let text = pre.text();
    let code = text.trim_matches('\n');

    let longest_run = code
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run.max(2) + 1);

    let language = code_language(pre).unwrap_or_default();
    format!("{fence}{language}\n{code}\n{fence}")
}

fn code_language(pre: &Selection) -> Option<String> {
    let code = pre.select("code");
    [pre.attr("class"), code.attr("class")]
        .into_iter()
        .flatten()
        .flat_map(|classes| {
            classes
                .split_whitespace()
                .filter_map(|class| {
                    class
                        .strip_prefix("language-")
                        .or_else(|| class.strip_prefix("lang-"))
                        .map(str::to_string)
                })
                .collect::<Vec<_>>()
        })
        .find(|lang| !lang.is_empty())
}

/// `![alt](src)` for an image; `None` when it has no source.
fn image_markdown(img: &Selection) -> Option<String> {
    let src = img.attr("src")?;
    let src = src.trim();
    if src.is_empty() {
        return None;
    }

    let alt = img
        .attr("alt")
        .map(|alt| WHITESPACE_NORMALIZE.replace_all(alt.trim(), " ").into_owned())
        .unwrap_or_default()
        .replace('[', "\\[")
        .replace(']', "\\]");
    let src = src.replace(' ', "%20").replace('(', "%28").replace(')', "%29");

    Some(format!("![{alt}]({src})"))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "markdown renderer panicked".to_string()
    }
}
