//! HTML Meta Tag Extraction
//!
//! Reads title, author and publication date from standard meta tags, Open
//! Graph, Twitter cards, Dublin Core and itemprop metas, plus machine
//! readable `<time datetime>` elements.

use dom_query::{Document, Selection};

use crate::dom;
use crate::metadata::date::parse_date;
use crate::result::Metadata;

/// Examine HTML meta tags for metadata.
///
/// Fields already set on `original` are kept.
#[must_use]
pub fn examine_meta(doc: &Document, original: Metadata) -> Metadata {
    let mut result = original;

    for node in doc.select("meta").nodes() {
        let meta = Selection::from(*node);

        let name = dom::get_attribute(&meta, "name")
            .or_else(|| dom::get_attribute(&meta, "property"))
            .or_else(|| dom::get_attribute(&meta, "itemprop"))
            .unwrap_or_default()
            .to_lowercase();

        let Some(content) = dom::non_empty_attribute(&meta, "content") else {
            continue;
        };
        if name.is_empty() {
            continue;
        }

        match name.as_str() {
            "author" | "article:author" | "dc.creator" | "byl" | "sailthru.author"
            | "parsely-author" => {
                let content = dom::collapse_whitespace(&content);
                if result.author.is_none() && validate_metadata_name(&content) {
                    result.author = Some(content);
                }
            }

            "og:title" | "twitter:title" | "dc.title" | "sailthru.title" | "parsely-title"
            | "headline" => {
                if result.title.is_none() {
                    result.title = Some(dom::collapse_whitespace(&content));
                }
            }

            "article:published_time" | "og:article:published_time" | "article:published"
            | "date" | "dc.date" | "dc.date.issued" | "dcterms.date" | "dcterms.created"
            | "datepublished" | "sailthru.date" | "parsely-pub-date" | "pubdate"
            | "publish_date" | "publishdate" | "publish-date" => {
                if result.date.is_none() {
                    result.date = parse_date(&content);
                }
            }

            _ => {}
        }
    }

    if result.date.is_none() {
        result.date = time_element_date(doc);
    }

    result
}

/// First parseable `<time datetime>` value, preferring ones marked as the
/// publication date.
fn time_element_date(doc: &Document) -> Option<chrono::DateTime<chrono::Utc>> {
    ["time[itemprop=\"datePublished\"]", "time.published", "time.entry-date", "time[datetime]"]
        .iter()
        .flat_map(|css| doc.select(css).nodes().to_vec())
        .find_map(|node| {
            let sel = Selection::from(node);
            dom::non_empty_attribute(&sel, "datetime").and_then(|d| parse_date(&d))
        })
}

/// Validate that a metadata name looks like a real author name.
///
/// Filters out:
/// - Empty or very short names
/// - Names that look like URLs
/// - Names with too many digits or special characters
/// - Names that look like JSON
#[must_use]
pub fn validate_metadata_name(name: &str) -> bool {
    let name = name.trim();

    if name.chars().count() < 2 || name.chars().count() > 120 {
        return false;
    }

    if name.starts_with("http://") || name.starts_with("https://") || name.starts_with("www.") {
        return false;
    }

    if name.contains(".com") || name.contains(".org") || name.contains(".net") {
        return false;
    }

    if name.starts_with('{') || name.starts_with('[') {
        return false;
    }

    // Too many digits (likely an ID)
    if name.chars().filter(char::is_ascii_digit).count() > 3 {
        return false;
    }

    let special_count = name
        .chars()
        .filter(|c| !c.is_alphanumeric() && !c.is_whitespace() && !matches!(c, '-' | '\'' | '.' | ','))
        .count();
    special_count <= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_meta_tags() {
        let html = r#"<html><head>
            <meta name="author" content="John Smith">
            <meta property="article:published_time" content="2024-02-10T09:00:00Z">
            <meta property="og:title" content="OG Title">
        </head><body></body></html>"#;

        let doc = Document::from(html);
        let metadata = examine_meta(&doc, Metadata::default());

        assert_eq!(metadata.author.as_deref(), Some("John Smith"));
        assert_eq!(metadata.title.as_deref(), Some("OG Title"));
        assert_eq!(
            metadata.date.map(|d| d.date_naive().to_string()).as_deref(),
            Some("2024-02-10")
        );
    }

    #[test]
    fn test_dublin_core() {
        let html = r#"<html><head>
            <meta name="DC.creator" content="Jane Doe">
            <meta name="DC.date" content="2024-03-15">
        </head><body></body></html>"#;

        let doc = Document::from(html);
        let metadata = examine_meta(&doc, Metadata::default());
        assert_eq!(metadata.author.as_deref(), Some("Jane Doe"));
        assert!(metadata.date.is_some());
    }

    #[test]
    fn test_time_element_fallback() {
        let html = r#"<article><time class="updated" datetime="bogus">x</time><time class="entry-date published" datetime="2023-07-04T12:00:00+00:00">July 4</time></article>"#;
        let doc = Document::from(html);
        let metadata = examine_meta(&doc, Metadata::default());
        assert_eq!(
            metadata.date.map(|d| d.date_naive().to_string()).as_deref(),
            Some("2023-07-04")
        );
    }

    #[test]
    fn test_preserves_existing_fields() {
        let html = r#"<head><meta name="author" content="Meta Author"></head>"#;
        let doc = Document::from(html);
        let original = Metadata {
            author: Some("Existing".to_string()),
            ..Metadata::default()
        };
        let metadata = examine_meta(&doc, original);
        assert_eq!(metadata.author.as_deref(), Some("Existing"));
    }

    #[test]
    fn test_validate_metadata_name() {
        assert!(validate_metadata_name("John Smith"));
        assert!(validate_metadata_name("Jean-Pierre O'Neil"));
        assert!(!validate_metadata_name("J"));
        assert!(!validate_metadata_name("https://example.com/author"));
        assert!(!validate_metadata_name("{\"name\":\"x\"}"));
        assert!(!validate_metadata_name("user123456"));
    }
}
