//! DOM-based metadata extraction.
//!
//! Fallbacks for when structured metadata is missing: `<title>` and URL
//! titles, bylines, dates printed in the page, and taxonomy link lists.
//! Each function only fills fields that are still empty.

use dom_query::{Document, Selection};
use url::Url;

use crate::dom;
use crate::metadata::date::date_from_text;
use crate::metadata::meta_tags::validate_metadata_name;
use crate::patterns::{AUTHOR_PREFIX, TITLE_SUFFIX};
use crate::result::Metadata;
use crate::selector::meta::{AUTHOR, CATEGORIES, CATEGORY_LINKS, DATE_TEXT, TAGS};
use crate::Options;

/// Words kept lowercase in URL-derived titles unless first or last.
const SMALL_WORDS: &[&str] = &[
    "a", "an", "the", "of", "in", "on", "at", "by", "for", "with", "to", "from", "up", "out",
    "off", "over", "and", "but", "or", "nor", "so", "yet",
];

/// URL path segments that double as category names.
const CATEGORY_VOCABULARY: &[&str] = &[
    "news",
    "blog",
    "articles",
    "posts",
    "automotive",
    "luxury",
    "vehicles",
    "personal-injury",
];

/// At most this many page-wide `/category/` links are used.
const MAX_CATEGORY_LINKS: usize = 3;

// ============================================================
// TITLE
// ============================================================

/// `<title>` text with a trailing ` - Site` or ` | Site` removed.
#[must_use]
pub fn examine_title_element(doc: &Document) -> Option<String> {
    let title = dom::clean_text(&doc.select("title").first());
    if title.is_empty() {
        return None;
    }
    let cleaned = TITLE_SUFFIX
        .captures(&title)
        .and_then(|c| c.get(1))
        .map_or_else(|| title.clone(), |m| m.as_str().to_string());
    Some(cleaned)
}

/// Title-cased last path segment of a URL.
///
/// # Example
///
/// ```rust
/// use wxr_migrate::metadata::dom_extraction::title_from_url;
///
/// let title = title_from_url("https://example.com/blog/the-best-cars-of-the-year.html");
/// assert_eq!(title.as_deref(), Some("The Best Cars of the Year"));
/// ```
#[must_use]
pub fn title_from_url(url: &str) -> Option<String> {
    let segment = last_path_segment(url)?;
    let words: Vec<&str> = segment
        .split(['-', '_', '+', ' '])
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return None;
    }

    let last = words.len() - 1;
    let titled: Vec<String> = words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i != 0 && i != last && SMALL_WORDS.contains(&lower.as_str()) {
                lower
            } else {
                capitalize(&lower)
            }
        })
        .collect();
    Some(titled.join(" "))
}

/// Last non-empty path segment without `.htm`/`.html`.
pub(crate) fn last_path_segment(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).next_back()?;
    let lower = segment.to_ascii_lowercase();
    let trimmed = if lower.ends_with(".html") {
        &segment[..segment.len() - 5]
    } else if lower.ends_with(".htm") {
        &segment[..segment.len() - 4]
    } else {
        segment
    };
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================
// AUTHOR
// ============================================================

/// Fill the author from byline elements.
///
/// All valid names found by the first productive query are joined with
/// `", "`.
#[must_use]
pub fn extract_dom_author(doc: &Document, original: Metadata) -> Metadata {
    let mut result = original;
    if result.author.is_some() {
        return result;
    }

    for matches in AUTHOR.each_query(doc) {
        let mut names: Vec<String> = Vec::new();
        for sel in &matches {
            let text = dom::clean_text(sel);
            let name = AUTHOR_PREFIX.replace(&text, "").trim().to_string();
            if validate_metadata_name(&name) && !names.contains(&name) {
                names.push(name);
            }
        }
        if !names.is_empty() {
            result.author = Some(names.join(", "));
            break;
        }
    }
    result
}

// ============================================================
// DATE
// ============================================================

/// Fill the date from text printed in date-labeled elements.
#[must_use]
pub fn extract_dom_date(doc: &Document, original: Metadata) -> Metadata {
    let mut result = original;
    if result.date.is_some() {
        return result;
    }

    result.date = DATE_TEXT
        .each_query(doc)
        .flatten()
        .find_map(|sel| date_from_text(&dom::clean_text(&sel)));
    result
}

// ============================================================
// CATEGORIES / TAGS
// ============================================================

/// Fill categories from taxonomy links, then page-wide category links,
/// then the URL path.
#[must_use]
pub fn extract_dom_categories(doc: &Document, original: Metadata, source_url: &str, opts: &Options) -> Metadata {
    let mut result = original;
    if !result.categories.is_empty() {
        return result;
    }

    let mut categories = first_label_list(CATEGORIES.each_query(doc), opts.max_label_len);

    if categories.is_empty() {
        let links: Vec<Selection> = CATEGORY_LINKS.first_non_empty(doc);
        categories = clean_labels(links.iter().map(label_text), opts.max_label_len);
        categories.truncate(MAX_CATEGORY_LINKS);
    }

    if categories.is_empty() {
        categories = categories_from_url(source_url);
    }

    result.categories = categories;
    result
}

/// Fill tags from tag links or `article:tag` metas.
#[must_use]
pub fn extract_dom_tags(doc: &Document, original: Metadata, opts: &Options) -> Metadata {
    let mut result = original;
    if result.tags.is_empty() {
        result.tags = first_label_list(TAGS.each_query(doc), opts.max_label_len);
    }
    result
}

/// Known section names found among the URL's path segments.
#[must_use]
pub fn categories_from_url(url: &str) -> Vec<String> {
    let Ok(parsed) = Url::parse(url) else {
        return Vec::new();
    };
    let Some(segments) = parsed.path_segments() else {
        return Vec::new();
    };

    let mut categories: Vec<String> = Vec::new();
    for segment in segments {
        let lower = segment.to_ascii_lowercase();
        if CATEGORY_VOCABULARY.contains(&lower.as_str()) {
            let label = lower
                .split('-')
                .map(capitalize)
                .collect::<Vec<_>>()
                .join(" ");
            if !categories.contains(&label) {
                categories.push(label);
            }
        }
    }
    categories
}

/// Labels of the first query that yields at least one valid label.
fn first_label_list<'a>(queries: impl Iterator<Item = Vec<Selection<'a>>>, max_len: usize) -> Vec<String> {
    for matches in queries {
        let labels = clean_labels(matches.iter().map(label_text), max_len);
        if !labels.is_empty() {
            return labels;
        }
    }
    Vec::new()
}

/// Link text, or the comma-separated `content` of a `meta` element.
fn label_text(sel: &Selection) -> Vec<String> {
    if dom::tag_name(sel).as_deref() == Some("meta") {
        return dom::get_attribute(sel, "content")
            .map(|c| c.split(',').map(str::to_string).collect())
            .unwrap_or_default();
    }
    vec![dom::clean_text(sel)]
}

/// Trim, drop empty or overlong labels, dedupe keeping discovery order.
fn clean_labels(items: impl Iterator<Item = Vec<String>>, max_len: usize) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for label in items.flatten() {
        let label = dom::collapse_whitespace(&label);
        if label.is_empty() || label.chars().count() >= max_len {
            continue;
        }
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels
}
