//! Batch runner.
//!
//! URLs are processed one at a time, in list order, with a fixed pause
//! between consecutive fetches. A failing URL is recorded with its reason and
//! the run moves on; nothing short of the list ending stops a batch.

use std::thread;

use serde::Serialize;

use crate::extract_post_with_options;
use crate::fetch::PageSource;
use crate::options::{FetchOptions, Options};
use crate::result::Post;
use crate::{Error, Result};

/// A URL that produced no post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedUrl {
    pub url: String,
    pub reason: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// Accepted posts, in input order.
    pub posts: Vec<Post>,

    /// Failed URLs, in input order.
    pub failures: Vec<FailedUrl>,
}

impl BatchReport {
    /// Failed URLs, one per line, ready to feed back as a URL list.
    #[must_use]
    pub fn failed_list(&self) -> String {
        let mut out = String::new();
        for failure in &self.failures {
            out.push_str(&failure.url);
            out.push('\n');
        }
        out
    }

    /// Pretty-printed JSON array of the accepted posts.
    pub fn json_dump(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.posts).map_err(|e| Error::Serialization(e.to_string()))
    }
}

/// URLs from a line-oriented list; blank lines and `#` comments are skipped.
///
/// ```rust
/// use wxr_migrate::batch::parse_url_list;
///
/// let list = "# old site\nhttps://example.com/a\n\n  https://example.com/b  \n";
/// assert_eq!(parse_url_list(list), vec!["https://example.com/a", "https://example.com/b"]);
/// ```
#[must_use]
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Fetch and extract every URL in order.
pub fn run_batch<S: PageSource + ?Sized>(
    urls: &[String],
    source: &S,
    options: &Options,
    fetch: &FetchOptions,
) -> BatchReport {
    let mut report = BatchReport::default();
    let delay = fetch.delay();

    for (i, url) in urls.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            thread::sleep(delay);
        }

        tracing::info!(url = %url, index = i + 1, total = urls.len(), "processing");
        match process_url(url, source, options) {
            Ok(post) => report.posts.push(post),
            Err(err) => {
                tracing::warn!(url = %url, error = %err, "url failed");
                report.failures.push(FailedUrl {
                    url: url.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    tracing::info!(
        accepted = report.posts.len(),
        failed = report.failures.len(),
        "batch complete"
    );
    report
}

fn process_url<S: PageSource + ?Sized>(url: &str, source: &S, options: &Options) -> Result<Post> {
    let html = source.fetch(url)?;
    extract_post_with_options(&html, url, options)
}
