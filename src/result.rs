//! Result types for extraction output.
//!
//! A [`Post`] is only ever built from a candidate that passed the quality
//! gate; [`Metadata`] is the intermediate record the resolver cascades fold
//! into.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Extraction strategy that produced a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Meta/JSON-LD title plus the content selector cascade.
    Metadata,
    /// Heading cascade plus paragraph-density region detection.
    Structural,
    /// Readability scoring pass.
    #[cfg(feature = "readability")]
    Readability,
}

impl Method {
    /// Every available method, in default preference order.
    #[cfg(feature = "readability")]
    pub const ALL: &'static [Method] = &[Method::Metadata, Method::Structural, Method::Readability];

    /// Every available method, in default preference order.
    #[cfg(not(feature = "readability"))]
    pub const ALL: &'static [Method] = &[Method::Metadata, Method::Structural];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Metadata => "metadata",
            Method::Structural => "structural",
            #[cfg(feature = "readability")]
            Method::Readability => "readability",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One anchor found in normalized content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperlink {
    /// `href` as it appeared before rewriting (entities decoded).
    pub url: String,

    /// Visible anchor text.
    pub text: String,

    /// The anchor's opening tag, verbatim.
    pub tag: String,
}

/// Link pointing at the source site itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalLink {
    #[serde(flatten)]
    pub link: Hyperlink,

    /// Path, query and fragment only.
    pub relative_url: String,
}

/// Link pointing at another host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLink {
    #[serde(flatten)]
    pub link: Hyperlink,

    /// Target host.
    pub domain: String,
}

/// Anchors of a post partitioned relative to the source host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperlinks {
    pub internal: Vec<InternalLink>,
    pub external: Vec<ExternalLink>,
    pub relative: Vec<Hyperlink>,
}

impl Hyperlinks {
    #[must_use]
    pub fn len(&self) -> usize {
        self.internal.len() + self.external.len() + self.relative.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A normalized blog post.
///
/// `content` never holds script or style elements, attributes other than
/// `href`, `src` and `alt`, or raw control characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Absolute URL the post was extracted from.
    pub source_url: String,

    pub title: String,

    /// Matches `[a-z0-9-]+`.
    pub slug: String,

    /// Normalized HTML fragment wrapped in a single `<div>`.
    pub content: String,

    /// Serialized as RFC 3339; absent when no date could be resolved.
    pub publish_date: Option<DateTime<Utc>>,

    pub author: String,

    pub categories: Vec<String>,

    pub tags: Vec<String>,

    pub hyperlinks: Hyperlinks,

    pub method: Method,
}

/// Metadata resolved from a document before gating.
///
/// All fields are optional as metadata may not be present in all documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    /// Page title.
    pub title: Option<String>,

    /// Author name(s), comma-separated.
    pub author: Option<String>,

    /// Publication date.
    pub date: Option<DateTime<Utc>>,

    /// Category labels in discovery order.
    pub categories: Vec<String>,

    /// Tag labels in discovery order.
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_serializes_snake_case() {
        let json = serde_json::to_string(&Method::Structural).unwrap_or_default();
        assert_eq!(json, "\"structural\"");
        assert_eq!(Method::Metadata.to_string(), "metadata");
    }

    #[test]
    fn hyperlinks_len_counts_all_classes() {
        let link = Hyperlink {
            url: "/a".to_string(),
            text: "a".to_string(),
            tag: "<a href=\"/a\">".to_string(),
        };
        let links = Hyperlinks {
            internal: vec![],
            external: vec![],
            relative: vec![link.clone(), link],
        };
        assert_eq!(links.len(), 2);
        assert!(!links.is_empty());
        assert!(Hyperlinks::default().is_empty());
    }
}
