//! # web2md
//!
//! Convert a web page into a clean Markdown document.
//!
//! A page goes through three stages: it is fetched over HTTP, its article
//! content is isolated from navigation, ads and other boilerplate, and that
//! content is rendered as Markdown with an optional YAML front matter block.
//!
//! ## Quick Start
//!
//! ```no_run
//! use web2md::{url_to_markdown, Options};
//!
//! let options = Options {
//!     include_metadata: true,
//!     ..Options::default()
//! };
//! let markdown = url_to_markdown("https://example.com/article", &options)?;
//! println!("{markdown}");
//! # Ok::<(), web2md::Error>(())
//! ```
//!
//! The stages can also be used on their own:
//!
//! ```rust
//! use web2md::{extract_content, format_document};
//!
//! let html = r#"<html><head><title>Notes</title></head><body><article>
//!     <p>Markdown documents are plain text files that stay readable without
//!     any rendering, which makes them a good archive format for articles.</p>
//! </article></body></html>"#;
//!
//! let content = extract_content(html, "https://example.com/notes")?;
//! assert_eq!(content.title(), "Notes");
//!
//! let markdown = format_document(&content, false)?;
//! assert!(markdown.starts_with("# Notes"));
//! # Ok::<(), web2md::Error>(())
//! ```
//!
//! ## Errors
//!
//! Every stage fails with its own [`Error`] variant, so a caller can tell a
//! network failure from a page without usable content.

mod error;
mod options;
mod patterns;
mod pipeline;

/// DOM helpers over `dom_query`.
pub mod dom;

/// Element tree utilities with text/tail model support.
pub mod etree;

/// Character encoding detection and decoding of response bodies.
pub mod encoding;

/// URL validation and HTTP fetching with retry.
pub mod fetcher;

/// Article extraction (pre-cleaning, primary and fallback strategies).
pub mod extractor;

/// Metadata extraction (HTML meta tags, bylines, dates).
pub mod metadata;

/// Link density testing for boilerplate detection.
pub mod link_density;

/// Markdown utilities (table conversion, whitespace normalisation).
pub mod markdown;

/// HTML fragment to Markdown document conversion.
pub mod converter;

// Public API - re-exports
pub use converter::{format_document, html_to_markdown};
pub use error::{Error, ExtractionFailure, Result};
pub use extractor::{extract_content, ExtractedContent};
pub use fetcher::{fetch_page, FetchOptions, HttpClient, Transport};
pub use options::{Options, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, RETRY_DELAY};
pub use pipeline::{url_to_markdown, url_to_markdown_with, write_output};
