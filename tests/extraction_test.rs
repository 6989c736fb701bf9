use wxr_migrate::{extract_post, extract_post_with_options, Error, Method, Options};

fn paragraphs(n: usize) -> String {
    (1..=n)
        .map(|i| format!("<p>Paragraph {i} explains one more detail about keeping a car in good shape.</p>"))
        .collect()
}

#[test]
fn url_date_used_when_page_has_no_date() {
    let html = format!(
        r#"<html><head><title>New Cars | Example Motors</title></head><body>
        <h1 class="entry-title">New Cars for the Season</h1>
        <div class="entry-content">{}</div></body></html>"#,
        paragraphs(5)
    );

    match extract_post(&html, "https://example.com/2024/march/5/new-cars") {
        Ok(post) => {
            let date = post.publish_date.map(|d| d.date_naive().to_string());
            assert_eq!(date.as_deref(), Some("2024-03-05"));
            assert_eq!(post.slug, "new-cars");
        }
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn missing_date_stays_absent() {
    let html = format!(
        r#"<html><body><h1 class="entry-title">An Undated Article</h1>
        <div class="entry-content">{}</div></body></html>"#,
        paragraphs(5)
    );

    match extract_post(&html, "https://example.com/blog/undated") {
        Ok(post) => {
            assert!(post.publish_date.is_none());
            assert_eq!(post.author, "Unknown");
            assert_eq!(post.categories, vec!["Blog"]);
        }
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn duplicate_paragraphs_collapse_to_one() {
    let repeated = "x".repeat(80);
    let html = format!(
        r#"<html><body><h1 class="entry-title">Duplicate Blocks Page</h1>
        <div class="entry-content">{}<p>{repeated}</p><p>{repeated}</p></div></body></html>"#,
        paragraphs(4)
    );

    match extract_post(&html, "https://example.com/dupes") {
        Ok(post) => assert_eq!(post.content.matches(&repeated).count(), 1),
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn three_character_title_falls_back_to_structural() {
    let html = format!(
        r#"<html><head><meta property="og:title" content="Hey"></head><body>
        <h1 class="entry-title">A Much Better Heading</h1>
        <div class="entry-content">{}</div></body></html>"#,
        paragraphs(5)
    );

    match extract_post(&html, "https://example.com/hey") {
        Ok(post) => {
            assert_eq!(post.method, Method::Structural);
            assert_eq!(post.title, "A Much Better Heading");
        }
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn metadata_fields_resolved() {
    let html = format!(
        r#"<html><head>
        <meta name="author" content="Dana Lee">
        <meta property="article:published_time" content="2023-11-20T08:30:00+02:00">
        <meta property="article:tag" content="Maintenance, Winter">
        </head><body><article class="post">
        <h1 class="entry-title">Winter Maintenance Checklist</h1>
        <div class="entry-content">{}</div>
        <footer><span class="cat-links"><a href="/category/tips">Tips</a><a href="/category/tips">Tips</a></span></footer>
        </article></body></html>"#,
        paragraphs(5)
    );

    match extract_post(&html, "https://example.com/winter-checklist") {
        Ok(post) => {
            assert_eq!(post.author, "Dana Lee");
            assert_eq!(
                post.publish_date.map(|d| d.to_rfc3339()).as_deref(),
                Some("2023-11-20T06:30:00+00:00")
            );
            assert_eq!(post.categories, vec!["Tips"]);
            assert_eq!(post.tags, vec!["Maintenance", "Winter"]);
            assert!(!post.content.contains("Tips"));
        }
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn content_is_clean_and_links_are_classified() {
    let html = format!(
        r#"<html><body><h1 class="entry-title">Cleanliness Of Content</h1>
        <div class="entry-content" style="color:red">
          <script>track()</script><style>.x{{}}</style>
          <div class="share-buttons"><a href="https://facebook.com/share">Share</a></div>
          {}
          <p><span style="font-weight:bold" onclick="x()">See the <a class="btn" target="_blank" href="https://example.com/guide?step=2#top">guide</a>,
          the <a href="https://partner.org/offer">offer</a> and <a href="/contact">contact</a>.</span></p>
          <img src="https://example.com/car.jpg" alt="A car" class="wp-image" width="600">
        </div></body></html>"#,
        paragraphs(4)
    );

    match extract_post(&html, "https://example.com/clean") {
        Ok(post) => {
            assert!(!post.content.contains("<script"));
            assert!(!post.content.contains("<style"));
            assert!(!post.content.contains("Share"));
            for attr in ["style=", "class=", "onclick=", "target=", "width="] {
                assert!(!post.content.contains(attr), "{attr} survived");
            }
            assert!(post.content.contains(r#"<a href="/guide?step=2#top">guide</a>"#));
            assert!(post.content.contains(r#"<a href="https://partner.org/offer">offer</a>"#));
            assert!(post.content.contains(r#"<img src="https://example.com/car.jpg" alt="A car">"#));

            assert_eq!(post.hyperlinks.internal.len(), 1);
            assert_eq!(post.hyperlinks.internal[0].relative_url, "/guide?step=2#top");
            assert_eq!(post.hyperlinks.internal[0].link.url, "https://example.com/guide?step=2#top");
            assert_eq!(post.hyperlinks.external.len(), 1);
            assert_eq!(post.hyperlinks.external[0].domain, "partner.org");
            assert_eq!(post.hyperlinks.relative.len(), 1);
            assert_eq!(post.hyperlinks.relative[0].url, "/contact");
        }
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn accepted_titles_respect_bounds() {
    let opts = Options::default();
    let long = "t".repeat(199);
    for title in ["Six ch", "A Reasonable Title", long.as_str()] {
        let html = format!(
            r#"<html><body><h1>{title}</h1><div class="entry-content">{}</div></body></html>"#,
            paragraphs(5)
        );
        match extract_post_with_options(&html, "https://example.com/t", &opts) {
            Ok(post) => {
                let len = post.title.chars().count();
                assert!(len > 5 && len < 200, "title length {len}");
            }
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        }
    }
}

#[test]
fn tiny_page_is_rejected_without_partial_post() {
    let result = extract_post(
        "<html><body><h1>Hello there world</h1><p>Too short.</p></body></html>",
        "https://example.com/tiny",
    );
    match result {
        Err(Error::Rejected { url, reason }) => {
            assert_eq!(url, "https://example.com/tiny");
            assert!(reason.contains("content length"));
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[test]
fn relative_source_url_is_invalid() {
    assert!(matches!(
        extract_post("<p>x</p>", "example.com/no-scheme"),
        Err(Error::InvalidUrl(_))
    ));
}
