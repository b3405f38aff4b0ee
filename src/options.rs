//! Configuration options for the conversion pipeline.
//!
//! The `Options` struct controls how a page is fetched and how the final
//! document is assembled.

use std::path::PathBuf;
use std::time::Duration;

/// User-Agent header sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("web2md/", env!("CARGO_PKG_VERSION"));

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Pause before retrying a request that failed to connect.
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Configuration options for [`url_to_markdown`](crate::url_to_markdown).
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use web2md::Options;
///
/// let options = Options {
///     include_metadata: true,
///     timeout: Duration::from_secs(10),
///     ..Options::default()
/// };
/// assert!(options.output_path.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Write the rendered document to this path as well as returning it.
    ///
    /// Missing parent directories are created.
    ///
    /// Default: `None`
    pub output_path: Option<PathBuf>,

    /// Request timeout for the fetch stage.
    ///
    /// Default: 30 seconds
    pub timeout: Duration,

    /// Prepend a YAML front matter block with title, author, date and source.
    ///
    /// Default: `false`
    pub include_metadata: bool,

    /// Custom User-Agent header.
    ///
    /// Default: `None` (sends [`DEFAULT_USER_AGENT`])
    pub user_agent: Option<String>,

    /// Delay before the single retry after a connection failure.
    ///
    /// Default: 1 second
    pub retry_delay: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            output_path: None,
            timeout: DEFAULT_TIMEOUT,
            include_metadata: false,
            user_agent: None,
            retry_delay: RETRY_DELAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert_eq!(options.retry_delay, Duration::from_secs(1));
        assert!(!options.include_metadata);
        assert!(options.user_agent.is_none());
        assert!(options.output_path.is_none());
    }

    #[test]
    fn test_default_user_agent() {
        assert_eq!(DEFAULT_USER_AGENT, "web2md/0.1.0");
    }
}
