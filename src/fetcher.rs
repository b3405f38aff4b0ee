//! Page fetching.
//!
//! Turns a URL into decoded page text. URLs are validated before any network
//! I/O, HTTP errors are reported with their status code, and a connection
//! failure is retried once after a fixed delay.
//!
//! The HTTP exchange itself sits behind the [`Transport`] trait so the retry
//! policy is written once; [`HttpClient`] is the `reqwest` implementation.

use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};
use url::Url;

use crate::encoding::decode_body;
use crate::error::{Error, Result};
use crate::options::{Options, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, RETRY_DELAY};

/// Total number of attempts for a request that fails to connect.
pub const MAX_ATTEMPTS: u32 = 2;

/// Settings for a single fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Per-request timeout.
    pub timeout: Duration,
    /// User-Agent header; `None` or empty sends [`DEFAULT_USER_AGENT`].
    pub user_agent: Option<String>,
    /// Delay before retrying after a connection failure.
    pub retry_delay: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            retry_delay: RETRY_DELAY,
        }
    }
}

impl From<&Options> for FetchOptions {
    fn from(options: &Options) -> Self {
        Self {
            timeout: options.timeout,
            user_agent: options.user_agent.clone(),
            retry_delay: options.retry_delay,
        }
    }
}

/// Raw HTTP response as seen by the fetcher.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// `Content-Type` header value, if any.
    pub content_type: Option<String>,
    /// Response body. Left empty for error statuses.
    pub body: Vec<u8>,
}

/// Transport-level failure, classified for the retry policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request did not complete within the timeout.
    #[error("{0}")]
    Timeout(String),
    /// The connection could not be established (refused, reset, DNS).
    #[error("{0}")]
    Connect(String),
    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Performs a single HTTP GET.
pub trait Transport {
    /// Issue a GET for `url` with the given User-Agent and timeout.
    fn get(
        &self,
        url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> std::result::Result<HttpResponse, TransportError>;
}

/// Blocking `reqwest` transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpClient;

impl Transport for HttpClient {
    fn get(
        &self,
        url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> std::result::Result<HttpResponse, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        let response = client
            .get(url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .send()
            .map_err(classify)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = if status < 400 {
            response.bytes().map_err(classify)?.to_vec()
        } else {
            Vec::new()
        };

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

/// Check that `url` is an absolute `http`/`https` URL with a host.
///
/// Failures are fetch errors without a status code.
pub fn validate_url(url: &str) -> Result<Url> {
    if url.is_empty() {
        return Err(Error::fetch("URL cannot be empty", url));
    }

    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            return Err(Error::fetch(
                "URL must include scheme (http:// or https://)",
                url,
            ));
        }
        Err(url::ParseError::EmptyHost) => {
            return Err(Error::fetch("Invalid URL format", url));
        }
        Err(e) => return Err(Error::fetch(format!("Invalid URL format: {e}"), url)),
    };

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::fetch(
            format!("Invalid URL scheme: {}", parsed.scheme()),
            url,
        ));
    }

    if parsed.host_str().map_or(true, str::is_empty) || !has_authority(url, parsed.scheme()) {
        return Err(Error::fetch("Invalid URL format", url));
    }

    Ok(parsed)
}

/// Whether the raw input spells out `scheme://authority`.
///
/// `Url::parse` repairs inputs such as `http:example.com` by taking the host
/// from the path, so the authority is checked on the text as written.
fn has_authority(url: &str, scheme: &str) -> bool {
    let Some((prefix, rest)) = url.trim().split_once("://") else {
        return false;
    };
    prefix.eq_ignore_ascii_case(scheme)
        && rest
            .split(['/', '?', '#'])
            .next()
            .is_some_and(|authority| !authority.is_empty())
}

/// Fetch a page over HTTP and return its decoded text.
pub fn fetch_page(url: &str, options: &FetchOptions) -> Result<String> {
    fetch_with(&HttpClient, url, options)
}

/// Fetch a page through the given transport.
pub fn fetch_with<T: Transport + ?Sized>(
    transport: &T,
    url: &str,
    options: &FetchOptions,
) -> Result<String> {
    validate_url(url)?;

    let user_agent = options
        .user_agent
        .as_deref()
        .filter(|ua| !ua.is_empty())
        .unwrap_or(DEFAULT_USER_AGENT);

    let mut attempt = 1;
    loop {
        debug!(url, attempt, "sending request");
        match transport.get(url, user_agent, options.timeout) {
            Ok(response) if response.status >= 400 => {
                return Err(Error::Fetch {
                    message: format!("HTTP {} error", response.status),
                    url: url.to_string(),
                    status: Some(response.status),
                });
            }
            Ok(response) => {
                info!(url, status = response.status, bytes = response.body.len(), "fetched page");
                return Ok(decode_body(&response.body, response.content_type.as_deref()));
            }
            Err(TransportError::Timeout(e)) => {
                return Err(Error::fetch(format!("Request timeout: {e}"), url));
            }
            Err(TransportError::Connect(e)) if attempt < MAX_ATTEMPTS => {
                warn!(url, attempt, error = %e, "connection failed, retrying");
                thread::sleep(options.retry_delay);
                attempt += 1;
            }
            Err(TransportError::Connect(e)) => {
                return Err(Error::fetch(
                    format!("Connection failed after {MAX_ATTEMPTS} attempts: {e}"),
                    url,
                ));
            }
            Err(TransportError::Other(e)) => {
                return Err(Error::fetch(format!("HTTP error: {e}"), url));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    type Reply = std::result::Result<HttpResponse, TransportError>;

    /// Transport that replays scripted replies and records each call.
    struct Scripted {
        replies: RefCell<VecDeque<Reply>>,
        calls: RefCell<Vec<(String, String)>>,
    }

    impl Scripted {
        fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl Transport for Scripted {
        fn get(&self, url: &str, user_agent: &str, _timeout: Duration) -> Reply {
            self.calls
                .borrow_mut()
                .push((url.to_string(), user_agent.to_string()));
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Other("no scripted reply".to_string())))
        }
    }

    fn ok(body: &str) -> Reply {
        Ok(HttpResponse {
            status: 200,
            content_type: Some("text/html; charset=utf-8".to_string()),
            body: body.as_bytes().to_vec(),
        })
    }

    fn fast() -> FetchOptions {
        FetchOptions {
            retry_delay: Duration::from_millis(1),
            ..FetchOptions::default()
        }
    }

    #[test]
    fn test_invalid_urls_never_reach_transport() {
        for url in [
            "",
            "example.com",
            "ftp://example.com/file",
            "mailto:someone@example.com",
            "http://",
            "http:example.com",
            "http:/example.com",
            r"https:\\example.com\a",
            "https:///path",
        ] {
            let transport = Scripted::new(vec![ok("unused")]);
            let err = fetch_with(&transport, url, &fast()).unwrap_err();
            assert!(matches!(err, Error::Fetch { status: None, .. }), "{url}: {err:?}");
            assert_eq!(transport.call_count(), 0, "{url} reached the transport");
        }
    }

    #[test]
    fn test_validation_messages() {
        let msg = |url: &str| validate_url(url).unwrap_err().to_string();
        assert_eq!(msg(""), "URL cannot be empty");
        assert_eq!(msg("example.com/page"), "URL must include scheme (http:// or https://)");
        assert_eq!(msg("ftp://example.com"), "Invalid URL scheme: ftp");
        assert_eq!(msg("http:example.com"), "Invalid URL format");
        assert_eq!(msg("http:/example.com"), "Invalid URL format");
    }

    #[test]
    fn test_authority_must_be_written_out() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("HTTP://Example.com/a?b#c").is_ok());
        assert!(validate_url("http://user@example.com:8080/").is_ok());
        assert!(!has_authority("http:example.com", "http"));
        assert!(!has_authority("http:/example.com", "http"));
        assert!(!has_authority("http:/x.com/://y", "http"));
        assert!(!has_authority("http://?q", "http"));
    }

    #[test]
    fn test_success_returns_body() {
        let transport = Scripted::new(vec![ok("<html>hi</html>")]);
        let body = fetch_with(&transport, "https://example.com", &fast()).unwrap();
        assert_eq!(body, "<html>hi</html>");
    }

    #[test]
    fn test_default_user_agent_sent() {
        let transport = Scripted::new(vec![ok("x")]);
        fetch_with(&transport, "https://example.com", &fast()).unwrap();
        assert_eq!(transport.calls.borrow()[0].1, "web2md/0.1.0");
    }

    #[test]
    fn test_custom_user_agent_sent() {
        let transport = Scripted::new(vec![ok("x")]);
        let options = FetchOptions {
            user_agent: Some("CustomBot/1.0".to_string()),
            ..fast()
        };
        fetch_with(&transport, "https://example.com", &options).unwrap();
        assert_eq!(transport.calls.borrow()[0].1, "CustomBot/1.0");
    }

    #[test]
    fn test_http_error_carries_status_and_is_not_retried() {
        let transport = Scripted::new(vec![
            Ok(HttpResponse { status: 404, ..HttpResponse::default() }),
            ok("unused"),
        ]);
        let err = fetch_with(&transport, "https://example.com/missing", &fast()).unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.to_string(), "HTTP 404 error");
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn test_timeout_is_not_retried() {
        let transport = Scripted::new(vec![
            Err(TransportError::Timeout("timed out".to_string())),
            ok("unused"),
        ]);
        let err = fetch_with(&transport, "https://example.com", &fast()).unwrap_err();
        assert!(err.to_string().contains("timeout"));
        assert_eq!(err.status_code(), None);
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn test_connect_failure_then_success() {
        let transport = Scripted::new(vec![
            Err(TransportError::Connect("connection refused".to_string())),
            ok("<p>recovered</p>"),
        ]);
        let body = fetch_with(&transport, "https://example.com", &fast()).unwrap();
        assert_eq!(body, "<p>recovered</p>");
        assert_eq!(transport.call_count(), 2);
    }

    #[test]
    fn test_two_connect_failures_fail() {
        let transport = Scripted::new(vec![
            Err(TransportError::Connect("refused".to_string())),
            Err(TransportError::Connect("refused".to_string())),
            ok("unused"),
        ]);
        let err = fetch_with(&transport, "https://example.com", &fast()).unwrap_err();
        assert!(err.to_string().contains("after 2 attempts"));
        assert_eq!(err.status_code(), None);
        assert_eq!(transport.call_count(), 2);
    }

    #[test]
    fn test_other_transport_error_is_not_retried() {
        let transport = Scripted::new(vec![
            Err(TransportError::Other("bad response".to_string())),
            ok("unused"),
        ]);
        let err = fetch_with(&transport, "https://example.com", &fast()).unwrap_err();
        assert_eq!(err.to_string(), "HTTP error: bad response");
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn test_fetch_options_from_pipeline_options() {
        let options = Options {
            timeout: Duration::from_secs(5),
            user_agent: Some("Bot".to_string()),
            ..Options::default()
        };
        let fetch = FetchOptions::from(&options);
        assert_eq!(fetch.timeout, Duration::from_secs(5));
        assert_eq!(fetch.user_agent.as_deref(), Some("Bot"));
    }
}
