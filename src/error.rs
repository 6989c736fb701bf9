//! Error types for wxr-migrate.
//!
//! Metadata gaps, malformed links and XML-hostile characters are repaired in
//! place and never show up here. Only per-URL failures, bad user patterns and
//! I/O-level problems do.

/// Error type for fetch, extraction, serialization and rewrite operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source URL is not an absolute http(s) URL.
    #[error("invalid source URL: {0}")]
    InvalidUrl(String),

    /// Every attempt of the transport ladder failed.
    #[error("fetch failed for {url} after {attempts} attempt(s): {reason}")]
    Fetch {
        url: String,
        attempts: usize,
        reason: String,
    },

    /// No extraction method produced a candidate that passed the quality gate.
    #[error("extraction rejected for {url}: {reason}")]
    Rejected { url: String, reason: String },

    /// Find/replace search string was empty or not a valid regex.
    #[error("invalid search pattern: {0}")]
    InvalidPattern(String),

    /// The XML writer failed.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Options file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for crate operations.
pub type Result<T> = std::result::Result<T, Error>;
