use wxr_migrate::find_replace::{apply, posts_containing, preview, unique_hrefs, SearchPattern};
use wxr_migrate::{Error, Hyperlinks, Method, Post};

fn post(slug: &str, content: &str) -> Post {
    Post {
        source_url: format!("https://example.com/{slug}"),
        title: format!("Title for {slug}"),
        slug: slug.to_string(),
        content: content.to_string(),
        publish_date: None,
        author: "Unknown".to_string(),
        categories: Vec::new(),
        tags: Vec::new(),
        hyperlinks: Hyperlinks::default(),
        method: Method::Metadata,
    }
}

#[test]
fn only_hrefs_are_rewritten() {
    let content = "<div>\n<p>See /old-path/docs or <a href=\"/old-path/docs\">the docs</a>.</p>\n<p><a href=\"/elsewhere\">/old-path/</a></p>\n</div>";
    let mut posts = vec![post("one", content), post("two", "<div><p>No links</p></div>")];

    let pattern = match SearchPattern::literal("/old-path") {
        Ok(p) => p,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };
    let found = match preview(&posts, &pattern, "/new-path") {
        Ok(found) => found,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].post_index, 0);
    assert_eq!(found[0].title, "Title for one");
    assert_eq!(found[0].matches.len(), 1);
    assert_eq!(found[0].matches[0].old_href, "/old-path/docs");
    assert_eq!(found[0].matches[0].new_href, "/new-path/docs");

    let ids: Vec<(usize, usize)> = found.iter().flat_map(|p| p.ids()).collect();
    assert_eq!(apply(&mut posts, &found, &ids), 1);
    assert_eq!(
        posts[0].content,
        "<div>\n<p>See /old-path/docs or <a href=\"/new-path/docs\">the docs</a>.</p>\n<p><a href=\"/elsewhere\">/old-path/</a></p>\n</div>"
    );
    assert_eq!(posts[1].content, "<div><p>No links</p></div>");
}

#[test]
fn unselected_matches_stay_untouched() {
    let mut posts = vec![
        post("a", r#"<a href="http://old.example.com/a">a</a>"#),
        post("b", r#"<a href="http://old.example.com/b">b</a>"#),
    ];
    let pattern = match SearchPattern::regex(r"^http://old\.example\.com") {
        Ok(p) => p,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };
    let found = match preview(&posts, &pattern, "https://example.com") {
        Ok(found) => found,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };
    assert_eq!(found.len(), 2);

    assert_eq!(apply(&mut posts, &found, &[(1, 0)]), 1);
    assert_eq!(posts[0].content, r#"<a href="http://old.example.com/a">a</a>"#);
    assert_eq!(posts[1].content, r#"<a href="https://example.com/b">b</a>"#);
}

#[test]
fn inventory_helpers() {
    let posts = vec![
        post("a", r#"<a href="/shop">s</a><a href="https://partner.org">p</a>"#),
        post("b", r#"<a href="/shop">s</a>"#),
    ];
    assert_eq!(posts_containing(&posts, "/shop"), vec![0, 1]);
    assert_eq!(posts_containing(&posts, "partner"), vec![0]);
    assert_eq!(
        unique_hrefs(&posts),
        vec![("/shop".to_string(), 2), ("https://partner.org".to_string(), 1)]
    );
}

#[test]
fn bad_group_reference_leaves_posts_untouched() {
    let content = r#"<a href="/old/guide">g</a>"#;
    let posts = vec![post("guide", content)];
    let pattern = match SearchPattern::regex(r"/old/(\w+)") {
        Ok(p) => p,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };

    match preview(&posts, &pattern, "/new/$1_v2") {
        Err(Error::InvalidPattern(msg)) => assert!(msg.contains("1_v2")),
        other => panic!("expected InvalidPattern, got {other:?}"),
    }
    assert_eq!(posts[0].content, content);
}
