//! Character encoding detection and transcoding.
//!
//! Fetched pages are decoded using the charset of the `Content-Type` header,
//! then the one declared in the page's own meta tags, then UTF-8.

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;

/// Charset named in a `<meta>` tag, either `charset="..."` or the
/// `http-equiv="Content-Type"` form with `content="...; charset=..."`.
#[allow(clippy::expect_used)]
static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>;]+)"#).expect("valid regex")
});

/// Encoding declared in the first 1024 bytes of a page, else UTF-8.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    let head = String::from_utf8_lossy(&html[..html.len().min(1024)]);
    META_CHARSET_RE
        .captures(&head)
        .and_then(|c| c.get(1))
        .and_then(|m| Encoding::for_label(m.as_str().as_bytes()))
        .unwrap_or(UTF_8)
}

/// Encoding named by a `Content-Type` header value, if any.
///
/// ```
/// use wxr_migrate::encoding::charset_from_content_type;
///
/// let enc = charset_from_content_type("text/html; charset=\"Shift_JIS\"");
/// assert_eq!(enc.map(|e| e.name()), Some("Shift_JIS"));
/// assert!(charset_from_content_type("text/html").is_none());
/// ```
#[must_use]
pub fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .and_then(|(_, value)| Encoding::for_label(value.trim().trim_matches(['"', '\'']).as_bytes()))
}

/// Transcode HTML bytes to UTF-8 string.
///
/// Detects the encoding from meta tags and converts to UTF-8, replacing
/// invalid sequences with U+FFFD.
///
/// # Examples
///
/// ```
/// use wxr_migrate::encoding::transcode_to_utf8;
///
/// let html = b"<html><body>Hello, World!</body></html>";
/// let utf8_str = transcode_to_utf8(html);
/// assert!(utf8_str.contains("Hello, World!"));
/// ```
#[must_use]
pub fn transcode_to_utf8(html: &[u8]) -> String {
    decode_with(detect_encoding(html), html)
}

/// Transcode a response body, preferring the header charset over meta tags.
#[must_use]
pub fn transcode_response(body: &[u8], content_type: Option<&str>) -> String {
    match content_type.and_then(charset_from_content_type) {
        Some(encoding) => decode_with(encoding, body),
        None => transcode_to_utf8(body),
    }
}

fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> String {
    if encoding == UTF_8 {
        return String::from_utf8_lossy(bytes).into_owned();
    }
    let (decoded, _encoding_used, _had_errors) = encoding.decode(bytes);
    decoded.into_owned()
}
