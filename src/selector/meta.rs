//! Metadata cascades: date labels, bylines, categories and tags.
//!
//! Category and tag queries resolve to link or `meta` elements; the
//! resolver reads link text or the `content` attribute respectively.

use super::{Cascade, Purpose};

/// Elements whose visible text usually carries the publication date.
pub const DATE_TEXT: Cascade = Cascade {
    purpose: Purpose::Date,
    queries: &[
        ".et_pb_title_meta_container",
        ".entry-date",
        ".post-date",
        ".published",
        "span.date",
        ".posted-on",
        ".entry-meta",
        ".post-meta",
        ".byline",
        "time",
    ],
};

/// Byline elements.
pub const AUTHOR: Cascade = Cascade {
    purpose: Purpose::Author,
    queries: &[
        "[itemprop=\"author\"] [itemprop=\"name\"]",
        ".author-name",
        ".author.vcard a",
        "a[rel=\"author\"]",
        ".entry-author",
        ".post-author",
        ".byline .author",
        "[itemprop=\"author\"]",
        ".author",
        ".byline",
    ],
};

/// Category link queries in priority order.
pub const CATEGORIES: Cascade = Cascade {
    purpose: Purpose::Categories,
    queries: &[
        ".et_pb_title_meta_container a[href*=\"/category/\"]",
        ".categories a",
        ".category-list a",
        ".post-categories a",
        ".entry-categories a",
        ".post-meta a[rel=\"category\"]",
        "a[rel=\"category tag\"]",
        ".entry-meta a[href*=\"/category/\"]",
        "span.cat-links a",
        "meta[property=\"article:section\"]",
    ],
};

/// Category links anywhere on the page; only the first few are used.
pub const CATEGORY_LINKS: Cascade = Cascade {
    purpose: Purpose::Categories,
    queries: &["a[href*=\"/category/\"]"],
};

/// Tag link queries in priority order.
pub const TAGS: Cascade = Cascade {
    purpose: Purpose::Tags,
    queries: &[
        ".tags a",
        ".tag-list a",
        ".post-tags a",
        ".entry-tags a",
        ".tags-links a",
        ".tagcloud a",
        "a[rel=\"tag\"]",
        "meta[property=\"article:tag\"]",
    ],
};
