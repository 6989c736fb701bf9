//! Content and title cascades.
//!
//! Page-builder body modules (Divi, Beaver Builder) come first because those
//! themes also wrap the whole page in generic `article`/`main` elements.

use super::{Cascade, Purpose};

/// Content region queries in priority order.
pub const CONTENT: Cascade = Cascade {
    purpose: Purpose::Content,
    queries: &[
        ".et_pb_module.et_pb_post_content",
        ".et_pb_post_content_0_tb_body",
        ".et_pb_post_content",
        ".et_pb_text_inner",
        ".fl-darklinks",
        ".entry-content",
        ".post-content",
        ".article-content",
        "div[itemprop=\"articleBody\"]",
        ".single-content",
        ".blog-post-content",
        "article .content",
        "article",
        "main article",
        "main",
        "[role=\"main\"]",
        ".content-area",
        "#content",
    ],
};

/// Title heading queries in priority order.
pub const TITLE: Cascade = Cascade {
    purpose: Purpose::Title,
    queries: &[
        "h1.entry-title",
        "h1.post-title",
        "h1[itemprop=\"headline\"]",
        ".et_pb_title_featured_container h1",
        ".et_pb_post_title h1",
        "article h1",
        "h1",
    ],
};
