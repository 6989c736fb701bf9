//! Metadata Resolver
//!
//! Every field has its own fallback cascade, and each cascade stops at the
//! first source that yields a value:
//!
//! - date: JSON-LD and meta tags / `<time datetime>`, then dates printed in
//!   date-labeled elements, then `/YYYY/month/DD/` in the URL, else absent
//! - author: JSON-LD and meta tags, then byline selectors, else the default
//! - categories: taxonomy links, then `/category/` links, then URL sections
//! - tags: tag links, then `article:tag` metas
//!
//! Resolution never fails; missing fields stay empty.

pub mod date;
pub mod dom_extraction;
pub mod json_ld;
pub mod meta_tags;

use dom_query::Document;

use crate::result::Metadata;
use crate::Options;

pub use dom_extraction::{examine_title_element, title_from_url};

/// Title, author and date from JSON-LD and meta tags only.
#[must_use]
pub fn extract_structured(doc: &Document) -> Metadata {
    let metadata = json_ld::extract_json_ld(doc, Metadata::default());
    meta_tags::examine_meta(doc, metadata)
}

/// Resolve date, author, categories and tags for a page.
///
/// The returned title is the structured one, if any; extraction methods pick
/// their own title cascade.
#[must_use]
pub fn extract_metadata(doc: &Document, source_url: &str, opts: &Options) -> Metadata {
    let mut metadata = extract_structured(doc);

    metadata = dom_extraction::extract_dom_author(doc, metadata);
    metadata = dom_extraction::extract_dom_date(doc, metadata);
    if metadata.date.is_none() {
        metadata.date = date::date_from_url(source_url);
    }
    metadata = dom_extraction::extract_dom_categories(doc, metadata, source_url, opts);
    metadata = dom_extraction::extract_dom_tags(doc, metadata, opts);

    post_process_metadata(metadata)
}

/// Trim string fields and drop the ones left empty.
fn post_process_metadata(mut metadata: Metadata) -> Metadata {
    metadata.title = metadata
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    metadata.author = metadata
        .author
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty());
    metadata
}
