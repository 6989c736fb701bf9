//! Quality Gate
//!
//! Accepts a candidate when its title length (characters) lies strictly
//! between `min_title_len` and `max_title_len`, its content is at least
//! `min_content_len` bytes, and the content holds at least one element.

use std::fmt;

use crate::extractor::Candidate;
use crate::patterns::MARKUP_ELEMENT;
use crate::Options;

/// Why a candidate was turned down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    TitleLength { len: usize, min: usize, max: usize },
    ContentTooShort { len: usize, min: usize },
    NoMarkup,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::TitleLength { len, min, max } => {
                write!(f, "title length {len} outside ({min}, {max})")
            }
            Rejection::ContentTooShort { len, min } => {
                write!(f, "content length {len} below {min}")
            }
            Rejection::NoMarkup => f.write_str("content has no markup"),
        }
    }
}

/// Check a candidate against the acceptance predicate.
pub fn check(candidate: &Candidate, opts: &Options) -> Result<(), Rejection> {
    let title_len = candidate.title.chars().count();
    if title_len <= opts.min_title_len || title_len >= opts.max_title_len {
        return Err(Rejection::TitleLength {
            len: title_len,
            min: opts.min_title_len,
            max: opts.max_title_len,
        });
    }

    if candidate.content.len() < opts.min_content_len {
        return Err(Rejection::ContentTooShort {
            len: candidate.content.len(),
            min: opts.min_content_len,
        });
    }

    if !MARKUP_ELEMENT.is_match(&candidate.content) {
        return Err(Rejection::NoMarkup);
    }

    Ok(())
}
