//! Configuration for extraction, fetching and export.
//!
//! `Options` tunes the extraction pipeline and quality gate, `FetchOptions`
//! the transport ladder and batch pacing. Both (plus the WXR [`Channel`])
//! can be loaded from a TOML file through [`Config`]; any key left out keeps
//! its default.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::result::Method;
use crate::wxr::Channel;
use crate::{Error, Result};

/// Configuration options for post extraction.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use wxr_migrate::Options;
///
/// let options = Options {
///     min_content_len: 500,
///     rewrite_internal_links: false,
///     ..Options::default()
/// };
/// assert_eq!(options.max_title_len, 200);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Titles must be strictly longer than this (characters).
    ///
    /// Default: `5`
    pub min_title_len: usize,

    /// Titles must be strictly shorter than this (characters).
    ///
    /// Default: `200`
    pub max_title_len: usize,

    /// Minimum length of the normalized content fragment (bytes of HTML).
    ///
    /// Default: `300`
    pub min_content_len: usize,

    /// Minimum visible text (whitespace excluded) a content region must hold
    /// before the selector cascade accepts it.
    ///
    /// Default: `100`
    pub min_region_text: usize,

    /// Paragraphs longer than this take part in duplicate removal.
    ///
    /// Default: `50`
    pub dedup_min_paragraph: usize,

    /// Category and tag labels must be shorter than this.
    ///
    /// Default: `50`
    pub max_label_len: usize,

    /// Maximum slug length.
    ///
    /// Default: `50`
    pub max_slug_len: usize,

    /// Author used when no byline is found.
    ///
    /// Default: `"Unknown"`
    pub default_author: String,

    /// Extraction methods in the order the quality gate tries them.
    ///
    /// Default: metadata, structural, then readability when the feature is on.
    pub methods: Vec<Method>,

    /// Rewrite internal absolute links to their path-only form.
    ///
    /// Default: `true`
    pub rewrite_internal_links: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            min_title_len: 5,
            max_title_len: 200,
            min_content_len: 300,
            min_region_text: 100,
            dedup_min_paragraph: 50,
            max_label_len: 50,
            max_slug_len: 50,
            default_author: "Unknown".to_string(),
            methods: Method::ALL.to_vec(),
            rewrite_internal_links: true,
        }
    }
}

/// Transport and pacing settings for batch runs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchOptions {
    /// User agent sent on every attempt.
    pub user_agent: String,

    /// Timeout of the first attempt, in seconds.
    ///
    /// Default: `10`
    pub timeout_secs: u64,

    /// Timeout of the fallback attempts, in seconds.
    ///
    /// Default: `30`
    pub extended_timeout_secs: u64,

    /// Attempts before a URL is given up on (1 to 3).
    ///
    /// Default: `3`
    pub max_attempts: usize,

    /// Pause between two consecutive URLs, in seconds.
    ///
    /// Default: `2.0`
    pub delay_secs: f64,
}

impl FetchOptions {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub fn extended_timeout(&self) -> Duration {
        Duration::from_secs(self.extended_timeout_secs)
    }

    /// Delay between URLs. Negative, non-finite or unrepresentably large
    /// values mean no delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_secs).unwrap_or(Duration::ZERO)
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            timeout_secs: 10,
            extended_timeout_secs: 30,
            max_attempts: 3,
            delay_secs: 2.0,
        }
    }
}

/// Everything a migration run can be configured with.
///
/// ```toml
/// [extraction]
/// min_content_len = 400
///
/// [fetch]
/// delay_secs = 3.0
///
/// [channel]
/// title = "My Blog"
/// link = "https://blog.example.org"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extraction: Options,
    pub fetch: FetchOptions,
    pub channel: Channel,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }
}
