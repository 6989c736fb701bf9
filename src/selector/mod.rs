//! Selector Cascade
//!
//! Ordered lists of CSS queries used to locate the title, the content region,
//! date labels, bylines and taxonomy lists. Queries go from the most specific
//! theme class names to generic tags. Evaluation order matters: real pages
//! often match several entries at different specificities, and the first
//! satisfying one wins.
//!
//! Queries never mutate the document.

use dom_query::{Document, Selection};

use crate::dom;

pub mod content;
pub mod meta;

/// What a cascade is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    Title,
    Content,
    Date,
    Author,
    Categories,
    Tags,
}

impl Purpose {
    /// Default text threshold: a match must hold strictly more visible
    /// characters than this.
    #[must_use]
    pub fn min_text_len(self) -> usize {
        match self {
            Purpose::Content => 100,
            _ => 0,
        }
    }
}

/// An ordered, typed list of CSS queries.
#[derive(Debug, Clone, Copy)]
pub struct Cascade {
    pub purpose: Purpose,
    pub queries: &'static [&'static str],
}

impl Cascade {
    /// First element, in query order then document order, whose visible text
    /// length exceeds the purpose's default threshold.
    #[must_use]
    pub fn first_match<'a>(&self, doc: &'a Document) -> Option<Selection<'a>> {
        self.first_match_with(doc, self.purpose.min_text_len())
    }

    /// Same as [`Cascade::first_match`] with an explicit threshold.
    ///
    /// # Example
    ///
    /// ```rust
    /// use wxr_migrate::dom;
    /// use wxr_migrate::selector::{Cascade, Purpose};
    ///
    /// const HEADINGS: Cascade = Cascade {
    ///     purpose: Purpose::Title,
    ///     queries: &["h1.entry-title", "h1"],
    /// };
    ///
    /// let doc = dom::parse(r#"<h1>Site</h1><h1 class="entry-title">Post</h1>"#);
    /// let found = HEADINGS.first_match(&doc).map(|s| dom::clean_text(&s));
    /// assert_eq!(found.as_deref(), Some("Post"));
    /// ```
    #[must_use]
    pub fn first_match_with<'a>(&self, doc: &'a Document, min_text: usize) -> Option<Selection<'a>> {
        for css in self.queries {
            for node in doc.select(css).nodes() {
                let sel = Selection::from(*node);
                if dom::visible_text_len(&sel) > min_text {
                    tracing::trace!(purpose = ?self.purpose, query = css, "cascade hit");
                    return Some(sel);
                }
            }
        }
        None
    }

    /// Every element matched by the first query that matches anything.
    #[must_use]
    pub fn first_non_empty<'a>(&self, doc: &'a Document) -> Vec<Selection<'a>> {
        for css in self.queries {
            let found: Vec<Selection<'a>> = doc
                .select(css)
                .nodes()
                .iter()
                .map(|n| Selection::from(*n))
                .collect();
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }

    /// Matches of every query, in query order, for callers that need to
    /// validate candidates before deciding which query succeeded.
    pub fn each_query<'a>(self, doc: &'a Document) -> impl Iterator<Item = Vec<Selection<'a>>> + 'a {
        self.queries.iter().map(move |css| {
            doc.select(css)
                .nodes()
                .iter()
                .map(|n| Selection::from(*n))
                .collect()
        })
    }
}
