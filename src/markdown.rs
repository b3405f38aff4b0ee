//! Markdown text utilities.
//!
//! GFM pipe-table rendering for data tables and the whitespace normalisation
//! applied to every rendered document.

use dom_query::Selection;

use crate::patterns::WHITESPACE_NORMALIZE;

/// Normalise whitespace in rendered Markdown.
///
/// Trailing whitespace is trimmed from every line, runs of blank lines
/// collapse to a single blank line, and the result is trimmed at both
/// ends. Applying it twice gives the same result as applying it once.
#[must_use]
pub fn normalize_whitespace(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut pending_blank = false;

    for line in markdown.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }

        if out.is_empty() {
            out.push_str(line.trim_start());
        } else {
            out.push('\n');
            if pending_blank {
                out.push('\n');
            }
            out.push_str(line);
        }
        pending_blank = false;
    }

    out
}

/// Convert an HTML table to GitHub Flavored Markdown.
///
/// The first row (from `<thead>` when present) becomes the header. Cell
/// text is collapsed to one line and `|` is escaped; `colspan` cells are
/// followed by empty cells; column alignment comes from `align` attributes.
///
/// # Example Output
///
/// ```text
/// | Header A | Header B |
/// | -------- | -------- |
/// | Cell 1   | Cell 2   |
/// ```
#[must_use]
pub fn html_table_to_markdown(table: &Selection) -> String {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut alignments: Vec<Alignment> = Vec::new();

    // Header rows first so they lead even when <thead> follows <tbody>
    let header = table.select("thead tr");
    let body = table.select("tr");
    let header_nodes = header.nodes();
    let body_nodes = body
        .nodes()
        .iter()
        .filter(|n| !header_nodes.iter().any(|h| h.id == n.id));

    for tr in header_nodes.iter().chain(body_nodes) {
        let tr = Selection::from(*tr);
        let mut row = Vec::new();

        for cell in tr.select("td, th").iter() {
            let column = row.len();
            let align = cell
                .attr("align")
                .map_or(Alignment::None, |a| Alignment::from_attr(&a));
            if column >= alignments.len() {
                alignments.push(align);
            } else if alignments[column] == Alignment::None {
                alignments[column] = align;
            }

            row.push(cell_text(&cell));

            let colspan = cell
                .attr("colspan")
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(1)
                .clamp(1, 64);
            row.extend(std::iter::repeat_n(String::new(), colspan - 1));
        }

        if !row.is_empty() {
            rows.push(row);
        }
    }

    if rows.is_empty() {
        return String::new();
    }

    let col_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    alignments.resize(col_count, Alignment::None);

    // Minimum width for ---
    let mut col_widths: Vec<usize> = vec![3; col_count];
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            col_widths[i] = col_widths[i].max(cell.chars().count());
        }
    }

    let mut output = String::new();

    for (row_idx, row) in rows.iter().enumerate() {
        output.push('|');
        for (col_idx, width) in col_widths.iter().enumerate() {
            let cell = row.get(col_idx).map_or("", String::as_str);
            output.push(' ');
            output.push_str(&pad_cell(cell, *width, alignments[col_idx]));
            output.push_str(" |");
        }
        output.push('\n');

        if row_idx == 0 {
            output.push('|');
            for (col_idx, width) in col_widths.iter().enumerate() {
                output.push_str(&format_separator(*width, alignments[col_idx]));
                output.push('|');
            }
            output.push('\n');
        }
    }

    output
}

fn cell_text(cell: &Selection) -> String {
    let text = cell.text();
    WHITESPACE_NORMALIZE
        .replace_all(text.trim(), " ")
        .replace('|', "\\|")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Alignment {
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    fn from_attr(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Self::Left,
            "center" => Self::Center,
            "right" => Self::Right,
            _ => Self::None,
        }
    }
}

/// Separator cell spanning the column width plus its two padding spaces.
fn format_separator(width: usize, align: Alignment) -> String {
    match align {
        Alignment::Left => format!(":{}", "-".repeat(width + 1)),
        Alignment::Center => format!(":{}:", "-".repeat(width)),
        Alignment::Right => format!("{}:", "-".repeat(width + 1)),
        Alignment::None => format!(" {} ", "-".repeat(width)),
    }
}

fn pad_cell(text: &str, width: usize, align: Alignment) -> String {
    let text_len = text.chars().count();
    if text_len >= width {
        return text.to_string();
    }

    let padding = width - text_len;
    match align {
        Alignment::Right => format!("{}{}", " ".repeat(padding), text),
        Alignment::Center => {
            let left = padding / 2;
            let right = padding - left;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
        }
        _ => format!("{}{}", text, " ".repeat(padding)),
    }
}
