//! Extraction methods.
//!
//! Every method reads the same parsed page and returns a [`Candidate`]; none
//! of them decides whether the candidate is good enough. That is the quality
//! gate's job, so methods can be reordered or added without touching it.

use dom_query::{Document, Selection};

use crate::dom;
use crate::extractor::{Candidate, Page};
use crate::html_processing::normalize_region;
use crate::metadata::dom_extraction::{examine_title_element, title_from_url};
use crate::result::Method;
use crate::selector::content::{CONTENT, TITLE};
use crate::Options;

/// Containers considered by the paragraph-density search.
const PARAGRAPH_PARENTS: &str = "article, main, section, div, td, blockquote, body";

/// Run one extraction method against a page.
#[must_use]
pub fn run(method: Method, page: &Page, opts: &Options) -> Candidate {
    match method {
        Method::Metadata => metadata_method(page, opts),
        Method::Structural => structural_method(page, opts),
        #[cfg(feature = "readability")]
        Method::Readability => readability_method(page, opts),
    }
}

/// Structured title first, then the content selector cascade.
fn metadata_method(page: &Page, opts: &Options) -> Candidate {
    let title = page
        .metadata
        .title
        .clone()
        .or_else(|| heading_title(&page.doc))
        .or_else(|| fallback_title(page))
        .unwrap_or_default();

    let content = match CONTENT.first_match_with(&page.doc, opts.min_region_text) {
        Some(region) => normalize_region(&region, opts),
        None => String::new(),
    };

    Candidate {
        method: Method::Metadata,
        title,
        content,
    }
}

/// Heading cascade for the title, paragraph density for the body.
fn structural_method(page: &Page, opts: &Options) -> Candidate {
    let title = heading_title(&page.doc)
        .or_else(|| fallback_title(page))
        .unwrap_or_default();

    let content = match densest_paragraph_parent(&page.doc) {
        Some(region) => normalize_region(&region, opts),
        None => normalize_region(&page.doc.select("body"), opts),
    };

    Candidate {
        method: Method::Structural,
        title,
        content,
    }
}

/// Readability scoring over a copy of the page.
#[cfg(feature = "readability")]
fn readability_method(page: &Page, opts: &Options) -> Candidate {
    use crate::html_processing::normalize_html;
    use dom_smoothie::Readability;

    let mut candidate = Candidate {
        method: Method::Readability,
        title: String::new(),
        content: String::new(),
    };

    let article = match Readability::with_document(page.doc.clone(), Some(page.url.as_str()), None)
        .and_then(|mut reader| reader.parse())
    {
        Ok(article) => article,
        Err(err) => {
            tracing::debug!(url = %page.url, error = %err, "readability found no article");
            return candidate;
        }
    };

    let title = dom::collapse_whitespace(&article.title);
    candidate.title = if title.is_empty() {
        fallback_title(page).unwrap_or_default()
    } else {
        title
    };
    candidate.content = normalize_html(&article.content, opts);
    candidate
}

/// First non-empty heading from the title cascade.
fn heading_title(doc: &Document) -> Option<String> {
    TITLE
        .first_match(doc)
        .map(|sel| dom::clean_text(&sel))
        .filter(|t| !t.is_empty())
}

/// `<title>` without its site suffix, then the URL's last segment.
fn fallback_title(page: &Page) -> Option<String> {
    examine_title_element(&page.doc).or_else(|| title_from_url(page.url.as_str()))
}

/// The element whose direct `<p>` children hold the most visible text.
///
/// Ties go to the element that comes first in the document.
fn densest_paragraph_parent(doc: &Document) -> Option<Selection<'_>> {
    let mut best: Option<(usize, Selection)> = None;

    for node in doc.select(PARAGRAPH_PARENTS).nodes() {
        let score: usize = node
            .children()
            .into_iter()
            .filter(|child| dom::node_tag(child).as_deref() == Some("p"))
            .map(|child| dom::visible_text_len(&Selection::from(child)))
            .sum();

        if score > 0 && best.as_ref().map_or(true, |(top, _)| score > *top) {
            best = Some((score, Selection::from(*node)));
        }
    }

    best.map(|(_, sel)| sel)
}
