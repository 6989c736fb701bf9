//! Link find/replace.
//!
//! Searches only anchor `href` values inside post content, previews every
//! change, and applies a caller-chosen subset. Applying touches nothing but
//! the bytes of the selected `href` values; everything else in the content
//! stays byte-identical.
//!
//! # Example
//!
//! ```rust
//! use wxr_migrate::find_replace::{apply, preview, SearchPattern};
//! # use wxr_migrate::{Hyperlinks, Method, Post};
//! # let mut posts = vec![Post {
//! #     source_url: "https://example.com/p".into(), title: "Example Post".into(),
//! #     slug: "p".into(), content: r#"<div><a href="/old-path/item">x</a></div>"#.into(),
//! #     publish_date: None, author: "Unknown".into(), categories: vec![], tags: vec![],
//! #     hyperlinks: Hyperlinks::default(), method: Method::Metadata,
//! # }];
//!
//! let pattern = SearchPattern::literal("/old-path")?;
//! let found = preview(&posts, &pattern, "/new-path")?;
//! let ids: Vec<(usize, usize)> = found.iter().flat_map(|p| p.ids()).collect();
//! let changed = apply(&mut posts, &found, &ids);
//!
//! assert_eq!(changed, 1);
//! assert_eq!(posts[0].content, r#"<div><a href="/new-path/item">x</a></div>"#);
//! # Ok::<(), wxr_migrate::Error>(())
//! ```

use std::collections::BTreeMap;
use std::ops::Range;

use regex::Regex;
use serde::Serialize;

use crate::dom;
use crate::links::scan_anchors;
use crate::result::Post;
use crate::{Error, Result};

/// What to look for inside `href` values.
#[derive(Debug, Clone)]
pub enum SearchPattern {
    Literal(String),
    Regex(Regex),
}

impl SearchPattern {
    /// Plain substring search.
    pub fn literal(search: &str) -> Result<Self> {
        if search.is_empty() {
            return Err(Error::InvalidPattern("search string is empty".to_string()));
        }
        Ok(Self::Literal(search.to_string()))
    }

    /// Regular expression search.
    ///
    /// The replacement may refer to groups as `$1`, `$name` or `${1}`, and
    /// `$$` is a literal `$`. A reference runs as far as letters, digits and
    /// `_` continue, so `$1_v2` names group `1_v2`; write `${1}_v2` instead.
    pub fn regex(search: &str) -> Result<Self> {
        if search.is_empty() {
            return Err(Error::InvalidPattern("search string is empty".to_string()));
        }
        Regex::new(search)
            .map(Self::Regex)
            .map_err(|e| Error::InvalidPattern(e.to_string()))
    }

    /// Build either kind from user input.
    pub fn new(search: &str, is_regex: bool) -> Result<Self> {
        if is_regex {
            Self::regex(search)
        } else {
            Self::literal(search)
        }
    }

    /// Check that every group a regex replacement refers to exists.
    ///
    /// Literal replacements are inserted as written and always pass.
    ///
    /// ```rust
    /// use wxr_migrate::find_replace::SearchPattern;
    ///
    /// let pattern = SearchPattern::regex(r"/old/(\w+)")?;
    /// assert!(pattern.check_replacement("/new/${1}_v2").is_ok());
    /// assert!(pattern.check_replacement("/new/$1_v2").is_err());
    /// assert!(pattern.check_replacement("/deals/$$50off").is_ok());
    /// # Ok::<(), wxr_migrate::Error>(())
    /// ```
    pub fn check_replacement(&self, replacement: &str) -> Result<()> {
        let Self::Regex(re) = self else {
            return Ok(());
        };

        let mut rest = replacement;
        while let Some(pos) = rest.find('$') {
            let after = &rest[pos + 1..];
            let (name, consumed) = if after.starts_with('$') {
                ("", 1)
            } else if let Some(braced) = after.strip_prefix('{') {
                let Some(end) = braced.find('}') else {
                    return Err(Error::InvalidPattern(format!(
                        "unclosed `${{` in replacement {replacement:?}"
                    )));
                };
                if end == 0 {
                    return Err(Error::InvalidPattern(format!("empty `${{}}` in replacement {replacement:?}")));
                }
                (&braced[..end], end + 2)
            } else {
                let len = after
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(after.len());
                (&after[..len], len)
            };

            if !name.is_empty() && !has_group(re, name) {
                return Err(Error::InvalidPattern(format!(
                    "replacement {replacement:?} refers to unknown group `{name}`; \
                     use `${{1}}` to end a group name, `$$` for a literal `$`"
                )));
            }
            rest = &after[consumed..];
        }
        Ok(())
    }

    /// Replaced `href`, or `None` when the pattern does not occur.
    ///
    /// The replacement must already have passed [`Self::check_replacement`].
    pub(crate) fn replace(&self, href: &str, replacement: &str) -> Option<String> {
        match self {
            Self::Literal(search) => href.contains(search.as_str()).then(|| href.replace(search.as_str(), replacement)),
            Self::Regex(re) => re.is_match(href).then(|| re.replace_all(href, replacement).into_owned()),
        }
    }
}

/// One anchor whose `href` matches the search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkMatch {
    pub post_index: usize,
    /// Position among this post's matches.
    pub match_index: usize,
    /// The anchor's opening tag, verbatim.
    pub original_tag: String,
    pub old_href: String,
    pub new_href: String,
    /// `href` value as written in the content.
    #[serde(skip)]
    raw_href: String,
    #[serde(skip)]
    span: Range<usize>,
}

/// Matches found in one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostMatches {
    pub post_index: usize,
    pub title: String,
    pub source_url: String,
    pub matches: Vec<LinkMatch>,
}

impl PostMatches {
    /// `(post_index, match_index)` of every match, for selecting all of them.
    pub fn ids(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.matches.iter().map(|m| (m.post_index, m.match_index))
    }
}

fn has_group(re: &Regex, name: &str) -> bool {
    match name.parse::<usize>() {
        Ok(index) => index < re.captures_len(),
        Err(_) => re.capture_names().flatten().any(|group| group == name),
    }
}

/// Every `href` the pattern would change, grouped per post.
///
/// Posts without matches are left out. Fails with
/// [`Error::InvalidPattern`] when a regex replacement refers to a group the
/// pattern does not have; no post is inspected in that case.
pub fn preview(posts: &[Post], pattern: &SearchPattern, replacement: &str) -> Result<Vec<PostMatches>> {
    pattern.check_replacement(replacement)?;

    let mut found = Vec::new();

    for (post_index, post) in posts.iter().enumerate() {
        let mut matches = Vec::new();
        for anchor in scan_anchors(&post.content) {
            let Some(new_href) = pattern.replace(&anchor.href, replacement) else {
                continue;
            };
            matches.push(LinkMatch {
                post_index,
                match_index: matches.len(),
                original_tag: anchor.tag,
                old_href: anchor.href,
                new_href,
                raw_href: anchor.raw_href,
                span: anchor.href_span,
            });
        }

        if !matches.is_empty() {
            found.push(PostMatches {
                post_index,
                title: post.title.clone(),
                source_url: post.source_url.clone(),
                matches,
            });
        }
    }

    tracing::debug!(
        posts = found.len(),
        matches = found.iter().map(|p| p.matches.len()).sum::<usize>(),
        "find/replace preview"
    );
    Ok(found)
}

/// Apply the selected matches of a preview. Returns how many were applied.
///
/// A match is skipped when its post no longer holds the previewed `href` at
/// the previewed position.
pub fn apply(posts: &mut [Post], preview: &[PostMatches], selected: &[(usize, usize)]) -> usize {
    let mut applied = 0;

    for group in preview {
        let Some(post) = posts.get_mut(group.post_index) else {
            continue;
        };

        let mut chosen: Vec<&LinkMatch> = group
            .matches
            .iter()
            .filter(|m| selected.contains(&(m.post_index, m.match_index)))
            .collect();
        // Back to front so earlier spans stay valid.
        chosen.sort_by(|a, b| b.span.start.cmp(&a.span.start));

        for m in chosen {
            if post.content.get(m.span.clone()) != Some(m.raw_href.as_str()) {
                tracing::warn!(
                    post = group.post_index,
                    href = %m.old_href,
                    "content changed since preview, skipping"
                );
                continue;
            }
            post.content.replace_range(m.span.clone(), &dom::escape_html(&m.new_href));
            applied += 1;
        }
    }

    tracing::info!(applied, "find/replace applied");
    applied
}

/// Indices of posts with an `href` containing `needle`.
#[must_use]
pub fn posts_containing(posts: &[Post], needle: &str) -> Vec<usize> {
    posts
        .iter()
        .enumerate()
        .filter(|(_, post)| scan_anchors(&post.content).iter().any(|a| a.href.contains(needle)))
        .map(|(i, _)| i)
        .collect()
}

/// Every distinct `href` across the posts with its number of occurrences,
/// sorted by `href`.
#[must_use]
pub fn unique_hrefs(posts: &[Post]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for post in posts {
        for anchor in scan_anchors(&post.content) {
            *counts.entry(anchor.href).or_default() += 1;
        }
    }
    counts.into_iter().collect()
}
