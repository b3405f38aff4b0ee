//! Link density testing.
//!
//! Blocks whose text is mostly link text are navigation, tag clouds or
//! "related" lists rather than article prose.

use dom_query::Selection;

use crate::dom;

/// Collect heuristics on link text.
///
/// Returns (total_link_length, num_short_links, non_empty_links)
fn collect_link_info(links: &Selection) -> (usize, usize, usize) {
    let mut link_length = 0;
    let mut n_short_links = 0;
    let mut n_non_empty_links = 0;

    for link in links.iter() {
        let text = link.text();
        let text_length = text.trim().chars().count();

        if text_length == 0 {
            continue;
        }

        link_length += text_length;
        if text_length < 10 {
            n_short_links += 1;
        }
        n_non_empty_links += 1;
    }

    (link_length, n_short_links, n_non_empty_links)
}

/// Ratio of link text to all text in the element, in `0.0..=1.0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn link_density(element: &Selection) -> f64 {
    let text_length = dom::text_content(element).trim().chars().count();
    if text_length == 0 {
        return 0.0;
    }
    let (link_length, _, _) = collect_link_info(&element.select("a"));
    (link_length as f64 / text_length as f64).min(1.0)
}

/// Check whether a block is rich in links and should be dropped.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn link_density_test(element: &Selection) -> bool {
    let links = element.select("a");
    let n_links = links.length();

    if n_links == 0 {
        return false;
    }

    let text_length = dom::text_content(element).trim().chars().count();

    // A single long link making up the whole block
    if n_links == 1 {
        let link_text_length = links.text().trim().chars().count();
        if link_text_length > 100 && (link_text_length as f64) > (text_length as f64) * 0.9 {
            return true;
        }
    }

    let tag_name = dom::tag_name(element).unwrap_or_default();

    let has_next_sibling = element
        .nodes()
        .first()
        .and_then(dom_query::NodeRef::next_element_sibling)
        .is_some();

    let limit_length: usize = if tag_name == "p" {
        if has_next_sibling { 30 } else { 60 }
    } else if has_next_sibling {
        100
    } else {
        300
    };

    if text_length >= limit_length {
        return false;
    }

    let (link_length, n_short_links, n_non_empty_links) = collect_link_info(&links);

    if n_non_empty_links == 0 {
        return true;
    }

    if (link_length as f64) > (text_length as f64) * 0.8 {
        return true;
    }

    // Mostly short links, typical of menus
    n_non_empty_links > 1 && (n_short_links as f64) / (n_non_empty_links as f64) > 0.8
}

/// Check whether a table is a link grid rather than data.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn link_density_test_tables(table: &Selection) -> bool {
    let links = table.select("a");
    if links.length() == 0 {
        return false;
    }

    let text_length = dom::text_content(table).trim().chars().count();
    if text_length < 200 {
        return false;
    }

    let (link_length, _, n_non_empty_links) = collect_link_info(&links);
    if n_non_empty_links == 0 {
        return true;
    }

    if text_length < 1000 {
        (link_length as f64) > (text_length as f64) * 0.8
    } else {
        (link_length as f64) > (text_length as f64) * 0.5
    }
}
