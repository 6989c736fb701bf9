//! Compiled regex patterns used across the pipeline.
//!
//! All patterns are compiled once at first use using `LazyLock`.
//! Patterns are organized by the stage that consumes them.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Content Normalizer
// =============================================================================

/// Class/id names of blocks that are never article body: share bars, social
/// widgets, comment threads, sidebars, and the tag/category/meta lists that
/// the metadata resolver reads separately.
pub static NON_CONTENT_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(shar(?:e|ing)|social|comment|sidebar|widget|related[-_]?posts|\btags?\b|tag[-_]?(?:list|cloud|links)|post[-_]?tags|entry[-_]?tags|categor|cat[-_]?links|\bmeta\b|post[-_]?meta|entry[-_]?meta|title[-_]?meta|author[-_]?box|breadcrumb|newsletter|\bsubscribe\b)",
    )
    .expect("NON_CONTENT_CLASS regex")
});

/// Page-builder widget wrappers that carry body text despite the `widget` token.
pub static CONTENT_WIDGET_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)elementor-widget-(?:text-editor|container|theme-post-content|heading)")
        .expect("CONTENT_WIDGET_CLASS regex")
});

/// Image sources that are tracking pixels or analytics beacons.
pub static TRACKING_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(analytics|pixel|tracking|doubleclick|beacon|facebook\.com/tr)")
        .expect("TRACKING_IMAGE regex")
});

// =============================================================================
// Metadata Resolver
// =============================================================================

/// Human-readable dates inside date-labeled elements, tried in order.
pub static DATE_TEXT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"([A-Za-z]{3,9}\.? \d{1,2}(?:st|nd|rd|th)?, \d{4})",
        r"(\d{1,2} [A-Za-z]{3,9} \d{4})",
        r"(\d{1,2}/\d{1,2}/\d{4})",
        r"(\d{4}-\d{2}-\d{2})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("DATE_TEXT regex"))
    .collect()
});

/// `/YYYY/month/DD/` segments in a URL path; month is a name or a number.
pub static URL_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/(\d{4})/([a-z]{3,9}|\d{1,2})/(\d{1,2})(?:/|$)").expect("URL_DATE regex")
});

/// Ordinal suffix after a day number ("5th").
pub static DAY_ORDINAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d)(?:st|nd|rd|th)\b").expect("DAY_ORDINAL regex")
});

/// `Title - Site` / `Title | Site`; group 1 is the title.
pub static TITLE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+\S)\s+[|\-–—]\s+\S.*$").expect("TITLE_SUFFIX regex")
});

/// Byline prefixes stripped from author text.
pub static AUTHOR_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:written by|posted by|by|author:?)\s+").expect("AUTHOR_PREFIX regex")
});

// =============================================================================
// Anchors in normalized content
// =============================================================================

/// Opening anchor tag.
pub static ANCHOR_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<a\b[^>]*>").expect("ANCHOR_OPEN regex")
});

/// Closing anchor tag.
pub static ANCHOR_CLOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</a\s*>").expect("ANCHOR_CLOSE regex")
});

/// `href` attribute inside a tag; exactly one of groups 1-3 holds the value.
pub static HREF_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\shref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).expect("HREF_ATTR regex")
});

/// Any tag, for stripping markup from anchor text.
pub static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<[^>]*>").expect("ANY_TAG regex")
});

// =============================================================================
// Quality gate and export
// =============================================================================

/// At least one element start tag.
pub static MARKUP_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<[A-Za-z][A-Za-z0-9]*[\s/>]").expect("MARKUP_ELEMENT regex")
});

/// Empty `href` attribute.
pub static EMPTY_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bhref\s*=\s*(?:""|'')"#).expect("EMPTY_HREF regex")
});

/// Runs of characters not allowed in a slug or nicename.
pub static NON_SLUG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-z0-9]+").expect("NON_SLUG regex")
});
