//! Post extraction pipeline.
//!
//! Validates the source URL, parses the page once, resolves metadata, then
//! runs the configured methods in order until the quality gate accepts a
//! candidate. The accepted candidate is classified for links, rewritten and
//! turned into a [`Post`]. A rejected page yields no partial record.

use crate::error::{Error, Result};
use crate::extractor::{gate, methods, Candidate, Page};
use crate::links;
use crate::options::Options;
use crate::result::Post;
use crate::url_utils::{parse_source_url, slug_for};

/// Main entry point for post extraction.
pub(crate) fn extract_post(html: &str, source_url: &str, options: &Options) -> Result<Post> {
    let url = parse_source_url(source_url)?;
    let page = Page::new(html, url, options);

    let mut reasons: Vec<String> = Vec::new();

    for &method in &options.methods {
        let candidate = methods::run(method, &page, options);
        match gate::check(&candidate, options) {
            Ok(()) => {
                tracing::info!(
                    url = %page.url,
                    method = %method,
                    title = %candidate.title,
                    "extraction accepted"
                );
                return Ok(build_post(&page, candidate, options));
            }
            Err(rejection) => {
                tracing::debug!(url = %page.url, method = %method, reason = %rejection, "method rejected");
                reasons.push(format!("{method}: {rejection}"));
            }
        }
    }

    if reasons.is_empty() {
        reasons.push("no extraction methods configured".to_string());
    }

    Err(Error::Rejected {
        url: page.url.to_string(),
        reason: reasons.join("; "),
    })
}

/// Turn an accepted candidate into a post.
///
/// Links are classified on the normalized content before internal ones are
/// rewritten, so the inventory keeps the original absolute `href`s.
fn build_post(page: &Page, candidate: Candidate, options: &Options) -> Post {
    let Candidate { method, title, mut content } = candidate;

    let hyperlinks = links::classify(&content, &page.url);
    if options.rewrite_internal_links && !hyperlinks.internal.is_empty() {
        content = links::rewrite_internal(&content, &page.url);
    }

    let metadata = &page.metadata;
    Post {
        source_url: page.url.to_string(),
        slug: slug_for(page.url.as_str(), &title, options.max_slug_len),
        title,
        content,
        publish_date: metadata.date,
        author: metadata
            .author
            .clone()
            .unwrap_or_else(|| options.default_author.clone()),
        categories: metadata.categories.clone(),
        tags: metadata.tags.clone(),
        hyperlinks,
        method,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Method;

    fn article(title_meta: &str, heading: &str) -> String {
        let body = "This paragraph carries enough words to count as article body text. ".repeat(6);
        format!(
            r#"<html><head><meta property="og:title" content="{title_meta}"></head><body>
            <h1 class="entry-title">{heading}</h1>
            <div class="entry-content"><p>{body}</p>
            <p>Read <a href="https://blog.example.com/other-post">another post</a> or
            <a href="https://elsewhere.org/page">an outside page</a>.</p></div>
            </body></html>"#
        )
    }

    #[test]
    fn test_first_method_accepted() {
        let html = article("Structured Post Title", "Heading Title");
        match extract_post(&html, "https://blog.example.com/2024/03/05/a-post/", &Options::default()) {
            Ok(post) => {
                assert_eq!(post.method, Method::Metadata);
                assert_eq!(post.title, "Structured Post Title");
                assert_eq!(post.slug, "a-post");
                assert_eq!(post.author, "Unknown");
                assert_eq!(post.hyperlinks.internal.len(), 1);
                assert_eq!(post.hyperlinks.external.len(), 1);
                assert!(post.content.contains(r#"href="/other-post""#));
                assert!(post.content.contains(r#"href="https://elsewhere.org/page""#));
            }
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        }
    }

    #[test]
    fn test_short_title_falls_back_to_second_method() {
        let html = article("Hey", "A Proper Heading");
        match extract_post(&html, "https://blog.example.com/a-post", &Options::default()) {
            Ok(post) => {
                assert_eq!(post.method, Method::Structural);
                assert_eq!(post.title, "A Proper Heading");
            }
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        }
    }

    #[test]
    fn test_rewrite_toggle() {
        let html = article("Structured Post Title", "Heading Title");
        let opts = Options {
            rewrite_internal_links: false,
            ..Options::default()
        };
        match extract_post(&html, "https://blog.example.com/a-post", &opts) {
            Ok(post) => assert!(post.content.contains(r#"href="https://blog.example.com/other-post""#)),
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        }
    }

    #[test]
    fn test_all_methods_rejected() {
        let opts = Options {
            methods: vec![Method::Metadata, Method::Structural],
            ..Options::default()
        };
        let result = extract_post("<html><body><h1>Hi</h1><p>short</p></body></html>", "https://example.com/x", &opts);
        match result {
            Err(Error::Rejected { url, reason }) => {
                assert_eq!(url, "https://example.com/x");
                assert!(reason.contains("metadata:"));
                assert!(reason.contains("structural:"));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_source_url() {
        let result = extract_post("<p>x</p>", "/relative/path", &Options::default());
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
