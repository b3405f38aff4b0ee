//! Element tree utilities.
//!
//! Tree edits and text iteration with lxml-style semantics, re-exported from
//! the `html-cleaning` crate. `iter_text` joins text and tail pieces with a
//! separator, which keeps words from separate blocks apart when measuring
//! content.

pub use html_cleaning::tree::{iter_text, remove};
