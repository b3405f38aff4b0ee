//! Compiled regex patterns and CSS selectors for content extraction.
//!
//! All patterns are compiled once on first use with `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Boilerplate Detection Patterns
// =============================================================================

/// Matches class/id tokens naming navigation elements.
///
/// `nav` only matches as a whole token or at a token edge, so layout names
/// like `in-page-nav-container` are left alone.
pub static NAVIGATION_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(^nav$|^nav[-_]|[-_]nav$|navbar|navigation|top[-_]?nav|main[-_]?menu|site[-_]?nav|\bmenu\b|site[-_]?footer|site[-_]?header|page[-_]?header|page[-_]?footer|breadcrumbs?|crumbs?|skip[-_]?link)",
    )
    .expect("NAVIGATION_CLASS regex")
});

/// Matches class/id tokens naming advertisement elements.
pub static ADVERTISEMENT_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(ad|ads|advert|advertisement|sponsor|sponsored|promo)$")
        .expect("ADVERTISEMENT_CLASS regex")
});

/// Matches class/id tokens naming page furniture around an article.
pub static BOILERPLATE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(comment|shar(?:e|ing)|social|related|recommend(?:ed)?|\bfooter\b|copyright|disclaimer|more[-_]?from|you[-_]?may[-_]?like|taboola|outbrain|cookie[-_]?(?:consent|notice|banner)|consent[-_]?banner|gdpr|\blogin\b|\bsign[-_]?(?:in|up)\b|\bsubscribe\b|subscription|newsletter|trending|popular|most[-_]?read|top[-_]?stories|tag[-_]?cloud|post[-_]?meta|entry[-_]?meta|\bwidget\b|sidebar|modal|popup)",
    )
    .expect("BOILERPLATE_CLASS regex")
});

/// Matches class/id values that explicitly mark the article body.
pub static CONTENT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(entry[-_]content|post[-_]?(?:content|body|text|entry)|article[-_]{1,2}(?:content|body|text)|articlebody|story[-_]?body|blog[-_]?(?:post[-_]?)?content|body[-_]text|page[-_]content|text[-_]content|wysiwyg)",
    )
    .expect("CONTENT_MARKER regex")
});

// =============================================================================
// Text Patterns
// =============================================================================

/// Matches runs of whitespace for normalization.
pub static WHITESPACE_NORMALIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("WHITESPACE_NORMALIZE regex")
});

/// Separators between an article title and the site name in `<title>`.
pub static TITLE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*[\|–—·]\s*|\s+-\s+").expect("TITLE_SEPARATOR regex")
});

// =============================================================================
// CSS Selectors
// =============================================================================

/// Elements that explicitly carry the article body.
pub const ARTICLE_BODY_SELECTOR: &str = "[itemprop='articleBody'], [itemprop='text']";

/// Selector for article elements.
pub const ARTICLE_SELECTOR: &str = "article, [role='article'], .article, .post, .entry";

/// Selector for main content areas.
pub const MAIN_SELECTOR: &str = "main, [role='main'], #main, .main, #content, .content";

/// Selector for author markup in the page body.
pub const AUTHOR_SELECTOR: &str =
    "[rel='author'], [itemprop='author'], .byline, .author-name, .author";

/// Selector for date markup in the page body.
pub const DATE_SELECTOR: &str = "[itemprop='datePublished'], [itemprop='dateCreated'], [class*='publish-date'], [class*='post-date'], [class*='entry-date'], [class*='article-date']";

/// Check whether a class or id value names boilerplate.
///
/// Each whitespace-separated token is checked on its own; advertisement names
/// only count as the first token.
#[must_use]
pub fn is_boilerplate(name: &str) -> bool {
    if name
        .split_whitespace()
        .any(|token| NAVIGATION_CLASS.is_match(token) || BOILERPLATE_CLASS.is_match(token))
    {
        return true;
    }

    // "body-ad-wrapper" is not an ad; "ad-container" is
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .next()
        .is_some_and(|token| !token.is_empty() && ADVERTISEMENT_CLASS.is_match(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_class_matches_nav_elements() {
        assert!(NAVIGATION_CLASS.is_match("main-nav"));
        assert!(NAVIGATION_CLASS.is_match("site-footer"));
        assert!(NAVIGATION_CLASS.is_match("breadcrumbs"));
        assert!(!NAVIGATION_CLASS.is_match("in-page-nav-container"));
        assert!(!NAVIGATION_CLASS.is_match("article-content"));
    }

    #[test]
    fn content_marker_matches_article_bodies() {
        assert!(CONTENT_MARKER.is_match("entry-content"));
        assert!(CONTENT_MARKER.is_match("post-content"));
        assert!(CONTENT_MARKER.is_match("article__body"));
        assert!(CONTENT_MARKER.is_match("storyBody"));
        assert!(!CONTENT_MARKER.is_match("sidebar-widget"));
    }

    #[test]
    fn boilerplate_names() {
        assert!(is_boilerplate("share-buttons"));
        assert!(is_boilerplate("related-posts"));
        assert!(is_boilerplate("ad"));
        assert!(is_boilerplate("ad-wrapper"));
        assert!(is_boilerplate("col main-menu"));
        assert!(!is_boilerplate("body-ad-wrapper"));
        assert!(!is_boilerplate("article-body"));
        assert!(!is_boilerplate("entry-content"));
    }

    #[test]
    fn title_separator_splits_site_suffix() {
        let parts: Vec<&str> = TITLE_SEPARATOR.split("Great Article | Example News").collect();
        assert_eq!(parts, vec!["Great Article", "Example News"]);
    }
}
