//! Hyperlink Classifier & Rewriter
//!
//! Works on the serialized, normalized fragment so a rewrite touches nothing
//! but the bytes of the `href` values it changes. Anchors are located with
//! [`scan_anchors`], which records the byte span of every `href` value; the
//! find/replace module uses the same scanner.

use std::ops::Range;

use url::Url;

use crate::dom;
use crate::patterns::{ANCHOR_CLOSE, ANCHOR_OPEN, ANY_TAG, HREF_ATTR};
use crate::result::{ExternalLink, Hyperlink, Hyperlinks, InternalLink};
use crate::url_utils::{path_only, same_host};

/// An anchor located in an HTML fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Opening tag, verbatim.
    pub tag: String,

    /// Byte span of the opening tag.
    pub tag_span: Range<usize>,

    /// Byte span of the `href` value, quotes excluded.
    pub href_span: Range<usize>,

    /// `href` value as written in the markup.
    pub raw_href: String,

    /// `href` with entities decoded.
    pub href: String,

    /// Visible text between the opening and the closing tag.
    pub text: String,
}

/// Where an `href` points relative to the source page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkClass {
    /// Same host; carries the path-only form.
    Internal(String),
    /// Another host; carries that host.
    External(String),
    /// No host, or not parseable as a URL.
    Relative,
    /// Empty or fragment-only.
    Ignored,
}

/// Every anchor with an `href` attribute, in document order.
#[must_use]
pub fn scan_anchors(html: &str) -> Vec<Anchor> {
    let mut anchors = Vec::new();

    for open in ANCHOR_OPEN.find_iter(html) {
        let tag = open.as_str();
        let Some(caps) = HREF_ATTR.captures(tag) else {
            continue;
        };
        let Some(value) = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)) else {
            continue;
        };

        let text_end = ANCHOR_CLOSE
            .find_at(html, open.end())
            .map_or(html.len(), |m| m.start());
        let inner = &html[open.end()..text_end];
        let text = dom::collapse_whitespace(&dom::unescape_basic(&ANY_TAG.replace_all(inner, "")));

        anchors.push(Anchor {
            tag: tag.to_string(),
            tag_span: open.range(),
            href_span: open.start() + value.start()..open.start() + value.end(),
            raw_href: value.as_str().to_string(),
            href: dom::unescape_basic(value.as_str()),
            text,
        });
    }

    anchors
}

/// Classify one `href` against the source URL.
///
/// Protocol-relative hrefs (`//host/path`) take the source's scheme. Only
/// http(s) links on the source's host and port are internal: `http` and
/// `https` count as the same site, while another scheme (`ftp:`) or an
/// explicit non-default port is external, since the path-only form would no
/// longer reach it.
#[must_use]
pub fn classify_href(href: &str, source: &Url) -> LinkClass {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return LinkClass::Ignored;
    }

    let absolute = if href.starts_with("//") {
        format!("{}:{href}", source.scheme())
    } else {
        href.to_string()
    };

    let Ok(target) = Url::parse(&absolute) else {
        return LinkClass::Relative;
    };
    let Some(host) = target.host_str() else {
        return LinkClass::Relative;
    };

    let web = matches!(target.scheme(), "http" | "https");
    if web && same_host(&target, source) && target.port() == source.port() {
        LinkClass::Internal(path_only(&target))
    } else {
        LinkClass::External(host.to_string())
    }
}

/// Partition the anchors of `content` into internal, external and relative.
#[must_use]
pub fn classify(content: &str, source: &Url) -> Hyperlinks {
    let mut links = Hyperlinks::default();

    for anchor in scan_anchors(content) {
        let class = classify_href(&anchor.href, source);
        let link = Hyperlink {
            url: anchor.href,
            text: anchor.text,
            tag: anchor.tag,
        };
        match class {
            LinkClass::Internal(relative_url) => links.internal.push(InternalLink { link, relative_url }),
            LinkClass::External(domain) => links.external.push(ExternalLink { link, domain }),
            LinkClass::Relative => links.relative.push(link),
            LinkClass::Ignored => {}
        }
    }

    tracing::trace!(
        internal = links.internal.len(),
        external = links.external.len(),
        relative = links.relative.len(),
        "classified links"
    );
    links
}

/// Rewrite internal absolute `href`s to their path-only form.
///
/// External and relative anchors, and every byte outside the rewritten
/// values, are left as they were.
///
/// ```rust
/// use url::Url;
/// use wxr_migrate::links::rewrite_internal;
///
/// let source = Url::parse("https://example.com/post").map_err(|e| e.to_string())?;
/// let html = r#"<p><a href="https://example.com/a?b=1">a</a> <a href="https://other.org/">o</a></p>"#;
/// assert_eq!(
///     rewrite_internal(html, &source),
///     r#"<p><a href="/a?b=1">a</a> <a href="https://other.org/">o</a></p>"#
/// );
/// # Ok::<(), String>(())
/// ```
#[must_use]
pub fn rewrite_internal(content: &str, source: &Url) -> String {
    let mut out = String::with_capacity(content.len());
    let mut last = 0;

    for anchor in scan_anchors(content) {
        if let LinkClass::Internal(relative) = classify_href(&anchor.href, source) {
            out.push_str(&content[last..anchor.href_span.start]);
            out.push_str(&dom::escape_html(&relative));
            last = anchor.href_span.end;
        }
    }

    out.push_str(&content[last..]);
    out
}
