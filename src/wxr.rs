//! WXR Serializer
//!
//! Turns a batch of [`Post`]s into a WordPress eXtended RSS 1.2 document.
//! Text fields go through the XML writer's escaping exactly once; post bodies
//! are placed verbatim inside a CDATA block after three repairs:
//!
//! 1. characters outside the XML 1.0 `Char` production are dropped
//! 2. `href=""` becomes `href="/"` (optional, see [`Channel::repair_empty_hrefs`])
//! 3. every `]]>` becomes `]] >` so the block cannot be closed early

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Deserialize;

use crate::patterns::EMPTY_HREF;
use crate::result::Post;
use crate::{Error, Result};

const WXR_VERSION: &str = "1.2";

const NAMESPACES: &[(&str, &str)] = &[
    ("xmlns:excerpt", "http://wordpress.org/export/1.2/excerpt/"),
    ("xmlns:content", "http://purl.org/rss/1.0/modules/content/"),
    ("xmlns:wfw", "http://wellformedweb.org/CommentAPI/"),
    ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
    ("xmlns:wp", "http://wordpress.org/export/1.2/"),
];

/// RFC 822 style date used by `pubDate`.
const DISPLAY_DATE: &str = "%a, %d %b %Y %H:%M:%S +0000";

/// Sortable date used by `wp:post_date`.
const SORTABLE_DATE: &str = "%Y-%m-%d %H:%M:%S";

/// Site-level fields of the export.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Channel {
    /// Default: `"Migrated Blog"`
    pub title: String,

    /// Default: `"https://newsite.com"`
    pub link: String,

    /// Default: `"Migrated content"`
    pub description: String,

    /// Default: `"en-US"`
    pub language: String,

    pub base_site_url: String,

    pub base_blog_url: String,

    /// Replace `href=""` in post bodies with `href="/"`.
    ///
    /// Default: `true`
    pub repair_empty_hrefs: bool,

    /// Channel `pubDate`. Set to the current time when the channel is built.
    #[serde(skip)]
    pub generated_at: DateTime<Utc>,
}

impl Default for Channel {
    fn default() -> Self {
        Self {
            title: "Migrated Blog".to_string(),
            link: "https://newsite.com".to_string(),
            description: "Migrated content".to_string(),
            language: "en-US".to_string(),
            base_site_url: "https://newsite.com".to_string(),
            base_blog_url: "https://newsite.com".to_string(),
            repair_empty_hrefs: true,
            generated_at: Utc::now(),
        }
    }
}

/// Serialize a batch of posts into a WXR document.
///
/// # Example
///
/// ```rust
/// use wxr_migrate::wxr::{to_wxr, Channel};
///
/// let xml = to_wxr(&[], &Channel::default())?;
/// assert!(xml.starts_with("<?xml"));
/// assert!(xml.contains("<wp:wxr_version>1.2</wp:wxr_version>"));
/// # Ok::<(), wxr_migrate::Error>(())
/// ```
pub fn to_wxr(posts: &[Post], channel: &Channel) -> Result<String> {
    let mut w = WxrWriter::new();

    w.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    for &attr in NAMESPACES {
        rss.push_attribute(attr);
    }
    w.event(Event::Start(rss))?;
    w.start("channel")?;

    w.text_element("title", &channel.title)?;
    w.text_element("link", &channel.link)?;
    w.text_element("description", &channel.description)?;
    w.text_element("pubDate", &channel.generated_at.format(DISPLAY_DATE).to_string())?;
    w.text_element("language", &channel.language)?;
    w.text_element("wp:wxr_version", WXR_VERSION)?;
    w.text_element("wp:base_site_url", &channel.base_site_url)?;
    w.text_element("wp:base_blog_url", &channel.base_blog_url)?;

    for post in posts {
        write_item(&mut w, post, channel)?;
    }

    w.end("channel")?;
    w.end("rss")?;

    let xml = w.finish()?;
    tracing::info!(posts = posts.len(), bytes = xml.len(), "serialized WXR document");
    Ok(xml)
}

fn write_item(w: &mut WxrWriter, post: &Post, channel: &Channel) -> Result<()> {
    w.start("item")?;

    w.text_element("title", &post.title)?;
    w.text_element("link", &post.source_url)?;
    if let Some(date) = post.publish_date {
        w.text_element("pubDate", &date.format(DISPLAY_DATE).to_string())?;
    }
    w.text_element("dc:creator", &post.author)?;

    let mut guid = BytesStart::new("guid");
    guid.push_attribute(("isPermaLink", "false"));
    w.text_element_with(guid, &post.source_url)?;

    w.text_element("description", "")?;
    w.text_element("wp:post_id", &post_id(&post.source_url).to_string())?;
    if let Some(date) = post.publish_date {
        let sortable = date.format(SORTABLE_DATE).to_string();
        w.text_element("wp:post_date", &sortable)?;
        w.text_element("wp:post_date_gmt", &sortable)?;
    }
    w.text_element("wp:post_name", &post.slug)?;
    w.text_element("wp:status", "publish")?;
    w.text_element("wp:post_type", "post")?;
    w.text_element("wp:post_password", "")?;

    let body = prepare_content(&post.content, channel.repair_empty_hrefs);
    w.start("content:encoded")?;
    w.event(Event::CData(BytesCData::new(body.as_str())))?;
    w.end_inline("content:encoded")?;

    for (domain, labels) in [("category", &post.categories), ("post_tag", &post.tags)] {
        for label in labels {
            let mut category = BytesStart::new("category");
            category.push_attribute(("domain", domain));
            category.push_attribute(("nicename", nicename(label).as_str()));
            w.text_element_with(category, label)?;
        }
    }

    w.text_element("excerpt:encoded", "")?;
    w.end("item")
}

/// Stable numeric id for a source URL, in `1..=999_999_999`.
///
/// The first eight bytes of the URL's BLAKE3 hash, read little-endian.
#[must_use]
pub fn post_id(source_url: &str) -> u64 {
    let hash = blake3::hash(source_url.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(head) % 999_999_999 + 1
}

/// URL-safe form of a category or tag label.
///
/// ```rust
/// use wxr_migrate::wxr::nicename;
///
/// assert_eq!(nicename("Cars & Trucks"), "cars-and-trucks");
/// assert_eq!(nicename("Café News!"), "caf-news");
/// ```
#[must_use]
pub fn nicename(label: &str) -> String {
    label
        .to_lowercase()
        .replace(' ', "-")
        .replace('&', "and")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

/// Drop every character XML 1.0 does not allow.
#[must_use]
pub fn sanitize_xml_chars(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.chars().filter(|&c| is_xml_char(c)).collect())
}

fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// Body text ready to sit inside a CDATA block.
fn prepare_content(content: &str, repair_empty_hrefs: bool) -> String {
    let mut body = sanitize_xml_chars(content).into_owned();
    if repair_empty_hrefs {
        body = EMPTY_HREF.replace_all(&body, r#"href="/""#).into_owned();
    }
    body.replace("]]>", "]] >")
}

/// Indenting XML writer with crate errors.
struct WxrWriter {
    inner: Writer<Vec<u8>>,
}

impl WxrWriter {
    fn new() -> Self {
        Self {
            inner: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.inner
            .write_event(event)
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    fn start(&mut self, name: &str) -> Result<()> {
        self.event(Event::Start(BytesStart::new(name)))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    /// Close an element on the same line as its content.
    fn end_inline(&mut self, name: &str) -> Result<()> {
        self.event(Event::Text(BytesText::new("")))?;
        self.end(name)
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.text_element_with(BytesStart::new(name), text)
    }

    fn text_element_with(&mut self, start: BytesStart<'_>, text: &str) -> Result<()> {
        let end = start.to_end().into_owned();
        self.event(Event::Start(start))?;
        self.event(Event::Text(BytesText::new(&sanitize_xml_chars(text))))?;
        self.event(Event::End(end))
    }

    fn finish(self) -> Result<String> {
        String::from_utf8(self.inner.into_inner()).map_err(|e| Error::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{Hyperlinks, Method};
    use chrono::TimeZone;

    fn post() -> Post {
        Post {
            source_url: "https://old.example.com/blog/spring-tips".to_string(),
            title: "Spring <Tips> & Tricks".to_string(),
            slug: "spring-tips".to_string(),
            content: "<div>\n<p>Hello <a href=\"/x?a=1&amp;b=2\">link</a></p>\n</div>".to_string(),
            publish_date: Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).single(),
            author: "Jane Roe".to_string(),
            categories: vec!["Home & Garden".to_string()],
            tags: vec!["Spring Cleaning".to_string()],
            hyperlinks: Hyperlinks::default(),
            method: Method::Metadata,
        }
    }

    fn render(posts: &[Post]) -> String {
        match to_wxr(posts, &Channel::default()) {
            Ok(xml) => xml,
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        }
    }

    #[test]
    fn test_post_id_is_stable_and_bounded() {
        let a = post_id("https://example.com/a");
        assert_eq!(a, post_id("https://example.com/a"));
        assert_ne!(a, post_id("https://example.com/b"));
        assert!((1..=999_999_999).contains(&a));
    }

    #[test]
    fn test_nicename() {
        assert_eq!(nicename("Home & Garden"), "home-and-garden");
        assert_eq!(nicename("SUV's 2024"), "suvs-2024");
    }

    #[test]
    fn test_sanitize_drops_control_chars() {
        assert_eq!(sanitize_xml_chars("a\u{0}b\u{b}c\u{1F}d\te\u{FFFE}"), "abcd\te");
        assert!(matches!(sanitize_xml_chars("clean"), Cow::Borrowed(_)));
        assert_eq!(sanitize_xml_chars("emoji \u{1F600}"), "emoji \u{1F600}");
    }

    #[test]
    fn test_prepare_content() {
        assert_eq!(
            prepare_content(r#"<a href="">x</a> a]]>b"#, true),
            r#"<a href="/">x</a> a]] >b"#
        );
        assert_eq!(prepare_content(r#"<a href="">x</a>"#, false), r#"<a href="">x</a>"#);
    }

    #[test]
    fn test_item_fields() {
        let xml = render(&[post()]);

        assert!(xml.contains("<title>Spring &lt;Tips&gt; &amp; Tricks</title>"));
        assert!(xml.contains("<pubDate>Tue, 05 Mar 2024 14:07:09 +0000</pubDate>"));
        assert!(xml.contains("<wp:post_date>2024-03-05 14:07:09</wp:post_date>"));
        assert!(xml.contains("<wp:post_date_gmt>2024-03-05 14:07:09</wp:post_date_gmt>"));
        assert!(xml.contains("<dc:creator>Jane Roe</dc:creator>"));
        assert!(xml.contains(r#"<guid isPermaLink="false">https://old.example.com/blog/spring-tips</guid>"#));
        assert!(xml.contains("<wp:post_name>spring-tips</wp:post_name>"));
        assert!(xml.contains("<wp:status>publish</wp:status>"));
        assert!(xml.contains("<wp:post_type>post</wp:post_type>"));
        assert!(xml.contains(
            r#"<category domain="category" nicename="home-and-garden">Home &amp; Garden</category>"#
        ));
        assert!(xml.contains(
            r#"<category domain="post_tag" nicename="spring-cleaning">Spring Cleaning</category>"#
        ));
        // Body is not escaped a second time.
        assert!(xml.contains(r#"<![CDATA[<div>"#));
        assert!(xml.contains(r#"<a href="/x?a=1&amp;b=2">link</a>"#));
        assert!(!xml.contains("&amp;amp;"));
    }

    #[test]
    fn test_missing_date_omits_date_fields() {
        let mut p = post();
        p.publish_date = None;
        let xml = render(&[p]);
        assert!(!xml.contains("<wp:post_date>"));
        assert!(!xml.contains("<wp:post_date_gmt>"));
        // Only the channel carries a pubDate.
        assert_eq!(xml.matches("<pubDate>").count(), 1);
    }

    #[test]
    fn test_channel_header() {
        let xml = render(&[]);
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        for (attr, uri) in NAMESPACES {
            assert!(xml.contains(&format!(r#"{attr}="{uri}""#)));
        }
        assert!(xml.contains("<title>Migrated Blog</title>"));
        assert!(xml.contains("<language>en-US</language>"));
        assert!(xml.contains("<wp:base_site_url>https://newsite.com</wp:base_site_url>"));
        assert!(!xml.contains("<item>"));
    }
}
