//! Extraction methods and the quality gate.
//!
//! # Module Structure
//!
//! - `methods`: the metadata, structural and readability strategies
//! - `gate`: the acceptance predicate that drives method fallback
//!
//! A [`Page`] is parsed and its metadata resolved once; each method turns it
//! into a [`Candidate`], and the first candidate the gate accepts becomes
//! the post.

pub mod gate;
pub mod methods;

use dom_query::Document;
use url::Url;

use crate::dom;
use crate::metadata::extract_metadata;
use crate::result::{Metadata, Method};
use crate::Options;

pub use gate::Rejection;

/// A parsed page shared by every extraction method.
pub struct Page {
    pub url: Url,
    pub doc: Document,
    pub metadata: Metadata,
}

impl Page {
    /// Parse `html` and resolve its metadata.
    #[must_use]
    pub fn new(html: &str, url: Url, opts: &Options) -> Self {
        let doc = dom::parse(html);
        let metadata = extract_metadata(&doc, url.as_str(), opts);
        Self { url, doc, metadata }
    }
}

/// Title and normalized content produced by one method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub method: Method,
    pub title: String,
    pub content: String,
}
