use chrono::{TimeZone, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use wxr_migrate::{to_wxr, Channel, Hyperlinks, Method, Post};

fn post(slug: &str, content: &str) -> Post {
    Post {
        source_url: format!("https://old.example.com/{slug}"),
        title: format!("Post about {slug}"),
        slug: slug.to_string(),
        content: content.to_string(),
        publish_date: Utc.with_ymd_and_hms(2023, 6, 1, 9, 0, 0).single(),
        author: "Sam Ortiz".to_string(),
        categories: vec!["Cars & Trucks".to_string()],
        tags: vec!["Road Trips".to_string(), "EV".to_string()],
        hyperlinks: Hyperlinks::default(),
        method: Method::Metadata,
    }
}

fn render(posts: &[Post], channel: &Channel) -> String {
    match to_wxr(posts, channel) {
        Ok(xml) => xml,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

/// Every CDATA body in the document, failing on malformed XML.
fn parse_bodies(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut bodies = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(Event::CData(data)) => bodies.push(String::from_utf8_lossy(&data.into_inner()).into_owned()),
            Ok(_) => {}
            Err(err) => panic!("malformed WXR at {}: {err:?}", reader.buffer_position()),
        }
    }
    bodies
}

#[test]
fn document_is_well_formed_and_complete() {
    let posts = vec![
        post("first-post", "<div>\n<p>One <a href=\"/a?x=1&amp;y=2\">link</a></p>\n</div>"),
        post("second-post", "<div>\n<p>Two</p>\n</div>"),
    ];
    let xml = render(&posts, &Channel::default());

    let bodies = parse_bodies(&xml);
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0], posts[0].content);

    assert_eq!(xml.matches("<item>").count(), 2);
    assert!(xml.contains("<wp:post_name>first-post</wp:post_name>"));
    assert!(xml.contains("<wp:post_name>second-post</wp:post_name>"));
    assert!(xml.contains(r#"nicename="cars-and-trucks">Cars &amp; Trucks</category>"#));
    assert!(xml.contains(r#"<category domain="post_tag" nicename="road-trips">Road Trips</category>"#));
    assert!(xml.contains(r#"<category domain="post_tag" nicename="ev">EV</category>"#));
    assert!(xml.contains("<dc:creator>Sam Ortiz</dc:creator>"));
}

#[test]
fn cdata_terminator_in_body_cannot_break_document() {
    let content = "<div>\n<p>Array access a[b[0]]>c is fine</p>\n</div>";
    let xml = render(&[post("edge", content)], &Channel::default());

    let bodies = parse_bodies(&xml);
    assert_eq!(bodies.len(), 1);
    assert!(bodies[0].contains("a[b[0]] >c is fine"));
}

#[test]
fn control_characters_are_dropped() {
    let content = "<div>\n<p>Bell\u{7} and null\u{0} removed</p>\n</div>";
    let mut p = post("controls", content);
    p.title = "Title\u{1B} with escape".to_string();
    let xml = render(&[p], &Channel::default());

    let bodies = parse_bodies(&xml);
    assert!(bodies[0].contains("Bell and null removed"));
    assert!(xml.contains("<title>Title with escape</title>"));
}

#[test]
fn empty_href_repair_follows_channel() {
    let content = r#"<div><p><a href="">home</a></p></div>"#;

    let repaired = render(&[post("links", content)], &Channel::default());
    assert!(repaired.contains(r#"<a href="/">home</a>"#));

    let channel = Channel {
        repair_empty_hrefs: false,
        ..Channel::default()
    };
    let kept = render(&[post("links", content)], &channel);
    assert!(kept.contains(r#"<a href="">home</a>"#));
}

#[test]
fn post_ids_are_deterministic_across_runs() {
    let posts = vec![post("stable", "<div></div>")];
    let first = render(&posts, &Channel::default());
    let second = render(&posts, &Channel::default());

    let id = |xml: &str| {
        xml.split("<wp:post_id>")
            .nth(1)
            .and_then(|rest| rest.split("</wp:post_id>").next())
            .map(str::to_string)
    };
    assert!(id(&first).is_some());
    assert_eq!(id(&first), id(&second));
}
