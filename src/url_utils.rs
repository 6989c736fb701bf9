//! URL Utility Functions
//!
//! Source URL validation, host comparison, the path-only form used when
//! rewriting internal links, and slug derivation.

use url::Url;

use crate::metadata::dom_extraction::last_path_segment;
use crate::patterns::NON_SLUG;
use crate::{Error, Result};

/// Check if a string is a valid absolute http(s) URL.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if s.is_empty() {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => (true, Some(url)),
        _ => (false, None),
    }
}

/// Parse a post's source URL, rejecting anything that is not absolute http(s).
pub fn parse_source_url(s: &str) -> Result<Url> {
    match is_absolute_url(s) {
        (true, Some(url)) => Ok(url),
        _ => Err(Error::InvalidUrl(s.to_string())),
    }
}

/// Case-insensitive host equality. URLs without a host never match.
#[must_use]
pub fn same_host(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(x), Some(y)) => x.eq_ignore_ascii_case(y),
        _ => false,
    }
}

/// Path plus query and fragment, without scheme or host.
///
/// ```rust
/// use url::Url;
/// use wxr_migrate::url_utils::path_only;
///
/// let url = Url::parse("https://Example.com/a/b?c=1#d").map_err(|e| e.to_string())?;
/// assert_eq!(path_only(&url), "/a/b?c=1#d");
/// # Ok::<(), String>(())
/// ```
#[must_use]
pub fn path_only(url: &Url) -> String {
    let mut out = url.path().to_string();
    if let Some(query) = url.query() {
        out.push('?');
        out.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

/// Reduce text to `[a-z0-9-]`, at most `max_len` bytes.
///
/// Returns an empty string when nothing usable is left.
#[must_use]
pub fn slugify(text: &str, max_len: usize) -> String {
    let lower = text.to_lowercase().replace('&', "and");
    let dashed = NON_SLUG.replace_all(&lower, "-");
    let trimmed = dashed.trim_matches('-');
    // Output is ASCII so byte truncation is safe.
    let capped = &trimmed[..trimmed.len().min(max_len)];
    capped.trim_end_matches('-').to_string()
}

/// Slug from the URL's last path segment, else the title, else `post`.
#[must_use]
pub fn slug_for(source_url: &str, title: &str, max_len: usize) -> String {
    let from_url = last_path_segment(source_url)
        .map(|s| slugify(&s, max_len))
        .filter(|s| !s.is_empty());
    from_url
        .or_else(|| Some(slugify(title, max_len)).filter(|s| !s.is_empty()))
        .unwrap_or_else(|| "post".to_string())
}
