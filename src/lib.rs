//! # wxr-migrate
//!
//! Extract blog posts from arbitrary web pages and export them as a
//! WordPress eXtended RSS (WXR) file.
//!
//! Each page goes through the same pipeline: a selector cascade locates the
//! title and body, the content normalizer rebuilds the body as a clean HTML
//! fragment, the metadata resolver finds date, author, categories and tags,
//! and the link classifier inventories and rewrites anchors. A quality gate
//! decides whether the result is kept or another extraction method is tried.
//!
//! ## Quick Start
//!
//! ```rust
//! use wxr_migrate::{extract_post, to_wxr, Channel};
//!
//! let body: String = (1..=6)
//!     .map(|i| format!("<p>Tip {i}: spring is the best time to check your tires and brakes.</p>"))
//!     .collect();
//! let html = format!(
//!     r#"<html><head><title>Spring Car Care | Example Motors</title></head>
//!     <body><article><h1 class="entry-title">Spring Car Care Tips</h1>
//!     <div class="entry-content">{body}</div></article></body></html>"#
//! );
//!
//! let post = extract_post(&html, "https://example.com/2024/03/05/spring-car-care/")?;
//! assert_eq!(post.slug, "spring-car-care");
//! assert_eq!(post.publish_date.map(|d| d.date_naive().to_string()).as_deref(), Some("2024-03-05"));
//!
//! let xml = to_wxr(&[post], &Channel::default())?;
//! assert!(xml.contains("<wp:post_name>spring-car-care</wp:post_name>"));
//! # Ok::<(), wxr_migrate::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Method fallback**: metadata-driven, structural, and (with the default
//!   `readability` feature) a readability pass, tried in order
//! - **Batch runs**: sequential fetching with a retry ladder and a fixed
//!   delay, failures recorded instead of aborting
//! - **Find/replace**: preview and selectively apply `href` rewrites

mod error;
mod extract;
mod options;
mod patterns;
mod result;

/// DOM helpers over `dom_query`.
pub mod dom;

/// Ordered CSS query cascades for titles, content regions and metadata.
pub mod selector;

/// Content normalizer.
pub mod html_processing;

/// Extraction methods and the quality gate.
pub mod extractor;

/// Metadata resolver (JSON-LD, meta tags, DOM and URL fallbacks).
pub mod metadata;

/// Hyperlink classification and internal link rewriting.
pub mod links;

/// URL validation, host comparison and slugs.
pub mod url_utils;

/// WXR serializer.
pub mod wxr;

/// Link find/replace over post content.
pub mod find_replace;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Page sources and the HTTP retry ladder.
pub mod fetch;

/// Sequential batch runs.
pub mod batch;

// Public API - re-exports
pub use batch::{parse_url_list, run_batch, BatchReport, FailedUrl};
pub use error::{Error, Result};
pub use fetch::{HttpFetcher, PageSource};
pub use options::{Config, FetchOptions, Options};
pub use result::{ExternalLink, Hyperlink, Hyperlinks, InternalLink, Metadata, Method, Post};
pub use wxr::{to_wxr, Channel};

/// Extracts a post from a page using default options.
///
/// # Arguments
///
/// * `html` - The page markup
/// * `source_url` - Absolute http(s) URL the page was fetched from
///
/// # Errors
///
/// [`Error::InvalidUrl`] for a relative or non-http(s) URL,
/// [`Error::Rejected`] when no extraction method passes the quality gate.
pub fn extract_post(html: &str, source_url: &str) -> Result<Post> {
    extract_post_with_options(html, source_url, &Options::default())
}

/// Extracts a post from a page with custom options.
///
/// # Example
///
/// ```rust
/// use wxr_migrate::{extract_post_with_options, Error, Method, Options};
///
/// let options = Options {
///     methods: vec![Method::Structural],
///     ..Options::default()
/// };
/// let result = extract_post_with_options("<p>Too short</p>", "https://example.com/x", &options);
/// assert!(matches!(result, Err(Error::Rejected { .. })));
/// ```
pub fn extract_post_with_options(html: &str, source_url: &str, options: &Options) -> Result<Post> {
    extract::extract_post(html, source_url, options)
}

/// Extracts a post from raw page bytes, detecting the encoding from meta
/// tags.
pub fn extract_post_bytes(html: &[u8], source_url: &str, options: &Options) -> Result<Post> {
    let html_str = encoding::transcode_to_utf8(html);
    extract_post_with_options(&html_str, source_url, options)
}
