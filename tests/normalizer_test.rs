use wxr_migrate::html_processing::normalize_html;
use wxr_migrate::Options;

const MESSY: &str = r#"
<div class="post-body" style="margin:0" data-id="9">
  <h1 class="headline">Choosing Winter Tires</h1>
  <p class="intro" style="font-size:18px">Winter tires are built from <span class="hl"><b>softer</b></span> rubber.</p>
  <script>window.dataLayer = [];</script>
  <style>.intro { color: red; }</style>
  <noscript><img src="https://pixel.example.com/p.gif"></noscript>
  <div class="wp-block-group"><div class="inner">
    <h3 id="why">Why they matter</h3>
    <ul class="checklist"><li style="x">Grip on ice</li><li>Shorter <a href="/braking" class="link" rel="nofollow" target="_blank">braking</a></li></ul>
  </div></div>
  <table class="specs" border="1"><tr><th>Size</th><td>205/55R16</td></tr></table>
  <aside class="sidebar"><p>Subscribe to our newsletter</p></aside>
  <figure><img src="/tires.jpg" alt="Winter tires" loading="lazy" width="800"><figcaption>A fresh set</figcaption></figure>
</div>"#;

#[test]
fn normalizing_twice_changes_nothing() {
    let opts = Options::default();
    let once = normalize_html(MESSY, &opts);
    let twice = normalize_html(&once, &opts);
    assert_eq!(once, twice);
}

#[test]
fn only_allowed_markup_survives() {
    let out = normalize_html(MESSY, &Options::default());

    assert!(out.starts_with("<div>\n"));
    assert!(out.ends_with("\n</div>"));
    for banned in ["<script", "<style", "<noscript", "<aside", "<span", "<b>", "<h1", "<figure"] {
        assert!(!out.contains(banned), "{banned} survived");
    }
    for attr in ["class=", "style=", "data-id=", "rel=", "target=", "loading=", "width=", "border=", "id="] {
        assert!(!out.contains(attr), "{attr} survived");
    }
    assert!(!out.contains("Subscribe"));
    assert!(!out.contains("dataLayer"));

    assert!(out.contains("<h2>Choosing Winter Tires</h2>"));
    assert!(out.contains("<strong>softer</strong>"));
    assert!(out.contains("<h3>Why they matter</h3>"));
    assert!(out.contains(r#"<li>Shorter <a href="/braking">braking</a></li>"#));
    assert!(out.contains("205/55R16"));
    assert!(out.contains(r#"<img src="/tires.jpg" alt="Winter tires">"#));
}

#[test]
fn identical_long_paragraphs_emitted_once() {
    let text = "y".repeat(80);
    let out = normalize_html(&format!("<div><p>{text}</p><p>{text}</p></div>"), &Options::default());
    assert_eq!(out, format!("<div>\n<p>{text}</p>\n</div>"));
}

#[test]
fn empty_region_yields_empty_wrapper() {
    let out = normalize_html("<div><script>x()</script><nav><a href='/'>Home</a></nav></div>", &Options::default());
    assert_eq!(out, "<div></div>");
}
