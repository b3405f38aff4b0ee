//! URL to Markdown pipeline.
//!
//! Fetch, extract and convert in sequence. Each stage's error is returned
//! unchanged so callers can tell which stage failed.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::converter::format_document;
use crate::error::{Error, Result};
use crate::extractor::extract_content;
use crate::fetcher::{fetch_with, FetchOptions, HttpClient, Transport};
use crate::options::Options;

/// Convert the page at `url` to a Markdown document.
///
/// When [`Options::output_path`] is set the document is also written there,
/// creating parent directories as needed. The document is returned either way.
///
/// # Errors
///
/// Returns the error of the first stage that fails: [`Error::Fetch`],
/// [`Error::Extraction`], [`Error::Conversion`], or [`Error::Output`] when
/// the file cannot be written.
///
/// # Example
///
/// ```no_run
/// use web2md::{url_to_markdown, Options};
///
/// let markdown = url_to_markdown("https://example.com/article", &Options::default())?;
/// println!("{markdown}");
/// # Ok::<(), web2md::Error>(())
/// ```
pub fn url_to_markdown(url: &str, options: &Options) -> Result<String> {
    url_to_markdown_with(&HttpClient, url, options)
}

/// [`url_to_markdown`] over a caller-supplied transport.
///
/// # Errors
///
/// Same as [`url_to_markdown`].
pub fn url_to_markdown_with<T: Transport + ?Sized>(
    transport: &T,
    url: &str,
    options: &Options,
) -> Result<String> {
    let html = fetch_with(transport, url, &FetchOptions::from(options))?;
    let content = extract_content(&html, url)?;
    let markdown = format_document(&content, options.include_metadata)?;

    if let Some(path) = &options.output_path {
        write_output(path, &markdown)?;
        info!(path = %path.display(), bytes = markdown.len(), "saved markdown");
    }

    Ok(markdown)
}

/// Write `document` to `path`, creating missing parent directories.
///
/// # Errors
///
/// Returns [`Error::Output`] if a directory or the file cannot be written.
pub fn write_output(path: &Path, document: &str) -> Result<()> {
    let output_error = |source| Error::Output {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(output_error)?;
    }

    fs::write(path, document).map_err(output_error)
}
