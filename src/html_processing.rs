//! Content Normalizer
//!
//! Turns a content region into a clean HTML fragment. The region is walked
//! once and the output is rebuilt from scratch rather than pruned in place,
//! so nothing outside the allow-list can leak through:
//!
//! - blocks: `p`, `h2`-`h6`, `ul`/`ol`/`li`, `blockquote`, `pre`, `table`
//! - inline: `a[href]`, `strong`, `em`, `code`, `sub`, `sup`, `br`
//! - images: `img[src][alt]`, appended after the text
//!
//! Containers without nested blocks become paragraphs, mixed containers are
//! split into one block per heading/list/paragraph, repeated lists and long
//! paragraphs are dropped, and the result is wrapped in a single `<div>`.
//! The walk is deterministic and normalizing its own output is a no-op.

use std::collections::HashSet;

use dom_query::{NodeRef, Selection};

use crate::dom::{self, escape_html};
use crate::patterns::{ANY_TAG, CONTENT_WIDGET_CLASS, NON_CONTENT_CLASS, TRACKING_IMAGE};
use crate::Options;

/// Subtrees that never hold article body.
const SKIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "nav", "header", "footer", "aside", "form",
    "iframe", "frame", "svg", "canvas", "button", "input", "select", "textarea", "label",
    "object", "embed", "video", "audio", "map", "link", "meta", "head", "title",
];

/// Elements that break inline flow.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "main", "body", "h1", "h2", "h3", "h4", "h5", "h6",
    "ul", "ol", "li", "dl", "dt", "dd", "blockquote", "pre", "table", "thead", "tbody",
    "tfoot", "tr", "td", "th", "caption", "figure", "figcaption", "address", "details",
    "summary", "center", "hr", "hgroup", "fieldset",
];

const SKIP_ROLES: &[&str] = &["navigation", "complementary", "banner", "contentinfo", "search"];

/// Normalize a content region into a wrapped HTML fragment.
///
/// The region itself is never treated as boilerplate, even when its own
/// class name would match a non-content pattern.
#[must_use]
pub fn normalize_region(region: &Selection, opts: &Options) -> String {
    let Some(root) = region.nodes().first() else {
        return wrap(Vec::new());
    };

    let mut normalizer = Normalizer::new(opts);
    let mut blocks = Vec::new();
    normalizer.blocks(root, &mut blocks);

    tracing::trace!(
        blocks = blocks.len(),
        images = normalizer.images.len(),
        "normalized region"
    );
    blocks.append(&mut normalizer.images);
    wrap(blocks)
}

/// Parse an HTML fragment and normalize its body.
///
/// # Example
///
/// ```rust
/// use wxr_migrate::{html_processing::normalize_html, Options};
///
/// let html = r#"<div class="x"><span style="color:red">Hello <b>world</b></span><script>x()</script></div>"#;
/// let out = normalize_html(html, &Options::default());
/// assert_eq!(out, "<div>\n<p>Hello <strong>world</strong></p>\n</div>");
/// ```
#[must_use]
pub fn normalize_html(fragment: &str, opts: &Options) -> String {
    let doc = dom::parse(fragment);
    normalize_region(&doc.select("body"), opts)
}

fn wrap(blocks: Vec<String>) -> String {
    if blocks.is_empty() {
        return "<div></div>".to_string();
    }
    format!("<div>\n{}\n</div>", blocks.join("\n"))
}

struct Normalizer<'o> {
    opts: &'o Options,
    /// Fingerprints of emitted lists and long paragraphs.
    seen: HashSet<String>,
    image_srcs: HashSet<String>,
    images: Vec<String>,
}

impl<'o> Normalizer<'o> {
    fn new(opts: &'o Options) -> Self {
        Self {
            opts,
            seen: HashSet::new(),
            image_srcs: HashSet::new(),
            images: Vec::new(),
        }
    }

    // === Block context ===

    fn blocks(&mut self, node: &NodeRef, out: &mut Vec<String>) {
        let mut inline = String::new();

        for child in node.children() {
            if child.is_text() {
                push_text(&mut inline, &child.text());
                continue;
            }
            let Some(tag) = dom::node_tag(&child) else {
                continue;
            };
            if is_excluded(&child, &tag) {
                continue;
            }

            match tag.as_str() {
                "img" => self.harvest_image(&child),
                "br" => inline.push_str("<br>"),
                "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                    self.flush(&mut inline, out);
                    self.heading(&child, &tag, out);
                }
                "p" => {
                    self.flush(&mut inline, out);
                    let mut buf = String::new();
                    self.inline(&child, &mut buf);
                    self.paragraph(&buf, out);
                }
                "ul" | "ol" => {
                    self.flush(&mut inline, out);
                    self.list(&child, &tag, out);
                }
                "blockquote" => {
                    self.flush(&mut inline, out);
                    let mut inner = Vec::new();
                    self.blocks(&child, &mut inner);
                    if !inner.is_empty() {
                        out.push(format!("<blockquote>{}</blockquote>", inner.join("\n")));
                    }
                }
                "pre" => {
                    self.flush(&mut inline, out);
                    preformatted(&child, out);
                }
                "table" => {
                    self.flush(&mut inline, out);
                    self.table(&child, out);
                }
                "hr" => self.flush(&mut inline, out),
                _ if contains_block(&child) => {
                    self.flush(&mut inline, out);
                    self.blocks(&child, out);
                }
                _ if is_block_tag(&tag) => {
                    self.flush(&mut inline, out);
                    let mut buf = String::new();
                    self.inline(&child, &mut buf);
                    self.paragraph(&buf, out);
                }
                _ => self.inline_element(&child, &tag, &mut inline),
            }
        }

        self.flush(&mut inline, out);
    }

    fn flush(&mut self, inline: &mut String, out: &mut Vec<String>) {
        let buf = std::mem::take(inline);
        self.paragraph(&buf, out);
    }

    fn paragraph(&mut self, buf: &str, out: &mut Vec<String>) {
        let html = trim_breaks(buf);
        if !has_visible(html) {
            return;
        }
        let fp = fingerprint(html);
        if fp.chars().count() > self.opts.dedup_min_paragraph && !self.seen.insert(format!("p:{fp}")) {
            tracing::trace!(paragraph = %fp, "dropped duplicate paragraph");
            return;
        }
        out.push(format!("<p>{html}</p>"));
    }

    fn heading(&mut self, node: &NodeRef, tag: &str, out: &mut Vec<String>) {
        let level = if tag == "h1" { "h2" } else { tag };
        let mut buf = String::new();
        self.inline(node, &mut buf);
        let html = trim_breaks(&buf);
        if has_visible(html) {
            out.push(format!("<{level}>{html}</{level}>"));
        }
    }

    fn list(&mut self, node: &NodeRef, tag: &str, out: &mut Vec<String>) {
        let Some(html) = self.render_list(node, tag) else {
            return;
        };
        if self.seen.insert(format!("l:{}", fingerprint(&html))) {
            out.push(html);
        } else {
            tracing::trace!("dropped duplicate list");
        }
    }

    fn render_list(&mut self, node: &NodeRef, tag: &str) -> Option<String> {
        let mut items = String::new();
        for child in node.children() {
            let Some(child_tag) = dom::node_tag(&child) else {
                continue;
            };
            if is_excluded(&child, &child_tag) {
                continue;
            }
            if matches!(child_tag.as_str(), "ul" | "ol") {
                // Stray nested list directly under a list: keep its items.
                if let Some(nested) = self.render_list(&child, &child_tag) {
                    items.push_str(&format!("<li>{nested}</li>"));
                }
            } else if let Some(item) = self.render_item(&child) {
                items.push_str(&item);
            }
        }
        if items.is_empty() {
            None
        } else {
            Some(format!("<{tag}>{items}</{tag}>"))
        }
    }

    fn render_item(&mut self, item: &NodeRef) -> Option<String> {
        let mut buf = String::new();
        let mut nested = String::new();
        for child in item.children() {
            if child.is_text() {
                push_text(&mut buf, &child.text());
                continue;
            }
            let Some(tag) = dom::node_tag(&child) else {
                continue;
            };
            if is_excluded(&child, &tag) {
                continue;
            }
            if matches!(tag.as_str(), "ul" | "ol") {
                if let Some(list) = self.render_list(&child, &tag) {
                    nested.push_str(&list);
                }
            } else {
                self.inline_element(&child, &tag, &mut buf);
            }
        }
        let text = trim_breaks(&buf);
        if !has_visible(text) && nested.is_empty() {
            return None;
        }
        Some(format!("<li>{text}{nested}</li>"))
    }

    fn table(&mut self, node: &NodeRef, out: &mut Vec<String>) {
        let mut rows = String::new();
        self.collect_rows(node, &mut rows);
        if !rows.is_empty() {
            out.push(format!("<table>{rows}</table>"));
        }
    }

    fn collect_rows(&mut self, node: &NodeRef, rows: &mut String) {
        for child in node.children() {
            match dom::node_tag(&child).as_deref() {
                Some("thead" | "tbody" | "tfoot") => self.collect_rows(&child, rows),
                Some("tr") => {
                    let mut cells = String::new();
                    let mut any_text = false;
                    for cell in child.children() {
                        let Some(cell_tag) = dom::node_tag(&cell) else {
                            continue;
                        };
                        if !matches!(cell_tag.as_str(), "td" | "th") {
                            continue;
                        }
                        let mut buf = String::new();
                        self.inline(&cell, &mut buf);
                        let html = trim_breaks(&buf);
                        any_text |= has_visible(html);
                        cells.push_str(&format!("<{cell_tag}>{html}</{cell_tag}>"));
                    }
                    if any_text {
                        rows.push_str(&format!("<tr>{cells}</tr>"));
                    }
                }
                _ => {}
            }
        }
    }

    // === Inline context ===

    fn inline(&mut self, node: &NodeRef, buf: &mut String) {
        for child in node.children() {
            if child.is_text() {
                push_text(buf, &child.text());
                continue;
            }
            let Some(tag) = dom::node_tag(&child) else {
                continue;
            };
            if is_excluded(&child, &tag) {
                continue;
            }
            self.inline_element(&child, &tag, buf);
        }
    }

    fn inline_element(&mut self, node: &NodeRef, tag: &str, buf: &mut String) {
        match tag {
            "img" => self.harvest_image(node),
            "br" => buf.push_str("<br>"),
            "a" => match anchor_href(node) {
                Some(href) => {
                    let open = format!("<a href=\"{}\">", escape_html(&href));
                    self.wrap_inline(node, &open, "</a>", buf);
                }
                None => self.inline(node, buf),
            },
            "b" | "strong" => self.wrap_inline(node, "<strong>", "</strong>", buf),
            "i" | "em" => self.wrap_inline(node, "<em>", "</em>", buf),
            "code" => self.wrap_inline(node, "<code>", "</code>", buf),
            "sub" => self.wrap_inline(node, "<sub>", "</sub>", buf),
            "sup" => self.wrap_inline(node, "<sup>", "</sup>", buf),
            _ if is_block_tag(tag) => {
                push_text(buf, " ");
                self.inline(node, buf);
                push_text(buf, " ");
            }
            _ => self.inline(node, buf),
        }
    }

    /// Render children between `open` and `close`, unwrapping when the
    /// element ends up with no visible text.
    fn wrap_inline(&mut self, node: &NodeRef, open: &str, close: &str, buf: &mut String) {
        let mark = buf.len();
        buf.push_str(open);
        let start = buf.len();
        self.inline(node, buf);
        if has_visible(&buf[start..]) {
            buf.push_str(close);
        } else {
            let inner = buf[start..].to_string();
            buf.truncate(mark);
            buf.push_str(&inner);
        }
    }

    // === Images ===

    fn harvest_image(&mut self, node: &NodeRef) {
        let sel = Selection::from(*node);
        let src = ["src", "data-src", "data-lazy-src"]
            .iter()
            .filter_map(|name| dom::non_empty_attribute(&sel, name))
            .find(|value| !value.starts_with("data:"));
        let Some(src) = src.map(|s| strip_controls(&s)) else {
            return;
        };
        if TRACKING_IMAGE.is_match(&src) {
            return;
        }
        let width = dom::get_attribute(&sel, "width");
        let height = dom::get_attribute(&sel, "height");
        if width.as_deref() == Some("1") && height.as_deref() == Some("1") {
            return;
        }
        if !self.image_srcs.insert(src.clone()) {
            return;
        }
        let alt = dom::get_attribute(&sel, "alt")
            .map(|a| dom::collapse_whitespace(&strip_controls(&a)))
            .unwrap_or_default();
        self.images.push(format!(
            "<img src=\"{}\" alt=\"{}\">",
            escape_html(&src),
            escape_html(&alt)
        ));
    }
}

// === Helpers ===

fn is_block_tag(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag)
}

/// Whether an element (below the region root) is boilerplate.
fn is_excluded(node: &NodeRef, tag: &str) -> bool {
    if SKIP_TAGS.contains(&tag) {
        return true;
    }
    let sel = Selection::from(*node);
    if sel.has_attr("hidden") {
        return true;
    }
    if let Some(role) = sel.attr("role") {
        if SKIP_ROLES.contains(&role.to_ascii_lowercase().as_str()) {
            return true;
        }
    }
    let class = sel.attr("class");
    let id = sel.attr("id");
    class.as_deref().is_some_and(is_non_content_name) || id.as_deref().is_some_and(is_non_content_name)
}

/// Tests each class token; WordPress taxonomy markers like `tag-cars` or
/// `category-news` on the post wrapper are not boilerplate.
pub(crate) fn is_non_content_name(value: &str) -> bool {
    value.split_whitespace().any(|token| {
        !is_taxonomy_marker(token)
            && NON_CONTENT_CLASS.is_match(token)
            && !CONTENT_WIDGET_CLASS.is_match(token)
    })
}

fn is_taxonomy_marker(token: &str) -> bool {
    let lower = token.to_ascii_lowercase();
    let rest = lower
        .strip_prefix("tag-")
        .or_else(|| lower.strip_prefix("category-"));
    rest.is_some_and(|r| {
        !matches!(
            r,
            "list" | "cloud" | "links" | "wrap" | "wrapper" | "box" | "container" | "meta"
        )
    })
}

fn contains_block(node: &NodeRef) -> bool {
    node.children().into_iter().any(|child| match dom::node_tag(&child) {
        Some(tag) => !is_excluded(&child, &tag) && (is_block_tag(&tag) || contains_block(&child)),
        None => false,
    })
}

fn anchor_href(node: &NodeRef) -> Option<String> {
    let sel = Selection::from(*node);
    let href = strip_controls(dom::non_empty_attribute(&sel, "href")?.as_str());
    let href = href.trim().to_string();
    if href.is_empty() || href.to_ascii_lowercase().starts_with("javascript:") {
        return None;
    }
    Some(href)
}

fn preformatted(node: &NodeRef, out: &mut Vec<String>) {
    let text = strip_controls(&Selection::from(*node).text());
    let text = text.trim_start_matches(['\n', '\r']).trim_end();
    if !text.is_empty() {
        out.push(format!("<pre>{}</pre>", escape_html(text)));
    }
}

fn strip_controls(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

/// Append a text node with whitespace collapsed, merging with the space
/// already at the end of the buffer.
fn push_text(buf: &mut String, raw: &str) {
    let cleaned = strip_controls(raw);
    if cleaned.is_empty() {
        return;
    }
    let leading = cleaned.starts_with(char::is_whitespace);
    let trailing = cleaned.ends_with(char::is_whitespace);
    let body = dom::collapse_whitespace(&cleaned);

    if leading && !ends_with_space(buf) {
        buf.push(' ');
    }
    if body.is_empty() {
        return;
    }
    buf.push_str(&escape_html(&body));
    if trailing {
        buf.push(' ');
    }
}

/// Whether the last visible character is a space; an empty buffer counts.
fn ends_with_space(buf: &str) -> bool {
    let mut in_tag = false;
    for c in buf.chars().rev() {
        if in_tag {
            if c == '<' {
                in_tag = false;
            }
            continue;
        }
        if c == '>' {
            in_tag = true;
            continue;
        }
        return c == ' ';
    }
    true
}

/// Whether rendered inline HTML has any non-whitespace text outside tags.
fn has_visible(html: &str) -> bool {
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag && !c.is_whitespace() => return true,
            _ => {}
        }
    }
    false
}

fn trim_breaks(html: &str) -> &str {
    let mut s = html.trim();
    loop {
        let before = s.len();
        s = s.strip_prefix("<br>").unwrap_or(s).trim_start();
        s = s.strip_suffix("<br>").unwrap_or(s).trim_end();
        if s.len() == before {
            return s;
        }
    }
}

fn fingerprint(html: &str) -> String {
    dom::collapse_whitespace(&ANY_TAG.replace_all(html, ""))
}
