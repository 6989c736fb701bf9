//! Page fetching.
//!
//! [`PageSource`] is the boundary between the pipeline and whatever delivers
//! raw HTML: the blocking [`HttpFetcher`], a headless renderer, or an
//! in-memory map in tests.
//!
//! The HTTP fetcher walks a fixed ladder, one rung per attempt:
//!
//! 1. browser-like headers, base timeout
//! 2. HTTP/1.1 only, extended timeout
//! 3. HTTP/1.1 only, extended timeout, user agent as the only header
//!
//! A 4xx response ends the ladder at once, apart from 408 and 429. Other
//! non-2xx responses and transport errors move on to the next rung.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT};
use reqwest::StatusCode;

use crate::encoding::transcode_response;
use crate::options::FetchOptions;
use crate::{Error, Result};

/// Anything that can turn a URL into page markup.
pub trait PageSource {
    /// Fetch the page at `url` as UTF-8 HTML.
    fn fetch(&self, url: &str) -> Result<String>;
}

/// One rung of the retry ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rung {
    http1_only: bool,
    extended_timeout: bool,
    minimal_headers: bool,
}

const LADDER: [Rung; 3] = [
    Rung {
        http1_only: false,
        extended_timeout: false,
        minimal_headers: false,
    },
    Rung {
        http1_only: true,
        extended_timeout: true,
        minimal_headers: false,
    },
    Rung {
        http1_only: true,
        extended_timeout: true,
        minimal_headers: true,
    },
];

/// Why one attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Failure {
    /// Worth trying the next rung.
    Retry(String),
    /// Another rung would get the same answer.
    Final(String),
}

impl Failure {
    fn from_status(status: StatusCode) -> Self {
        let reason = format!("HTTP {status}");
        if retryable(status) {
            Self::Retry(reason)
        } else {
            Self::Final(reason)
        }
    }
}

/// Client errors are final except request timeout and rate limiting.
fn retryable(status: StatusCode) -> bool {
    !status.is_client_error() || matches!(status, StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS)
}

/// Blocking HTTP page source with a bounded retry ladder.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    opts: FetchOptions,
}

impl HttpFetcher {
    #[must_use]
    pub fn new(opts: FetchOptions) -> Self {
        Self { opts }
    }

    fn attempts(&self) -> usize {
        self.opts.max_attempts.clamp(1, LADDER.len())
    }

    fn client(&self, rung: Rung) -> Result<Client> {
        let timeout = if rung.extended_timeout {
            self.opts.extended_timeout()
        } else {
            self.opts.timeout()
        };

        let mut builder = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .default_headers(self.headers(rung));
        if rung.http1_only {
            builder = builder.http1_only();
        }

        builder.build().map_err(|e| Error::Fetch {
            url: String::new(),
            attempts: 0,
            reason: format!("client setup: {e}"),
        })
    }

    fn headers(&self, rung: Rung) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(ua) = HeaderValue::from_str(&self.opts.user_agent) {
            headers.insert(USER_AGENT, ua);
        }
        if !rung.minimal_headers {
            headers.insert(
                ACCEPT,
                HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
            );
            headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        }
        headers
    }

    fn attempt(&self, url: &str, rung: Rung) -> std::result::Result<String, Failure> {
        let client = self.client(rung).map_err(|e| Failure::Final(e.to_string()))?;
        let response = client.get(url).send().map_err(|e| Failure::Retry(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Failure::from_status(status));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().map_err(|e| Failure::Retry(e.to_string()))?;
        Ok(transcode_response(&body, content_type.as_deref()))
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(FetchOptions::default())
    }
}

impl PageSource for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let mut attempts = 0;
        let mut last_error = String::new();

        for rung in LADDER.iter().take(self.attempts()) {
            attempts += 1;
            match self.attempt(url, *rung) {
                Ok(html) => {
                    tracing::debug!(url, attempt = attempts, bytes = html.len(), "fetched page");
                    return Ok(html);
                }
                Err(Failure::Retry(reason)) => {
                    tracing::debug!(url, attempt = attempts, ?rung, %reason, "fetch attempt failed");
                    last_error = reason;
                }
                Err(Failure::Final(reason)) => {
                    tracing::debug!(url, attempt = attempts, ?rung, %reason, "fetch failed, not retrying");
                    last_error = reason;
                    break;
                }
            }
        }

        Err(Error::Fetch {
            url: url.to_string(),
            attempts,
            reason: last_error,
        })
    }
}
