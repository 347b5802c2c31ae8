use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script\s*>").expect("script pattern compiles")
});
static STYLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b.*?</style\s*>").expect("style pattern compiles")
});
static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern compiles"));
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern compiles"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern compiles"));
static LINK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<link\b[^>]*>").expect("link tag pattern compiles"));
static REL_CANONICAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\brel\s*=\s*["']?\s*canonical\b"#).expect("rel pattern compiles")
});
static HREF_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bhref\s*=\s*["']([^"']+)["']"#).expect("href pattern compiles")
});

/// Flattens markup to whitespace-collapsed text: scripts, styles, comments and
/// tags become spaces, entities are decoded.
pub fn normalize_text(html: &str) -> String {
    let text = SCRIPT_BLOCK.replace_all(html, " ");
    let text = STYLE_BLOCK.replace_all(&text, " ");
    let text = COMMENT.replace_all(&text, " ");
    let text = TAG.replace_all(&text, " ");
    let decoded = html_escape::decode_html_entities(&text);
    // &nbsp; decodes to U+00A0, which `\s` already covers
    WHITESPACE.replace_all(&decoded, " ").trim().to_string()
}

/// Author-declared canonical URL, resolved against the page's final URL.
pub fn canonical_link(html: &str, final_url: &str) -> Option<String> {
    let base = Url::parse(final_url).ok();
    LINK_TAG
        .find_iter(html)
        .map(|tag| tag.as_str())
        .filter(|tag| REL_CANONICAL.is_match(tag))
        .find_map(|tag| HREF_ATTR.captures(tag))
        .and_then(|caps| {
            let href = html_escape::decode_html_entities(caps[1].trim()).into_owned();
            match &base {
                Some(base) => base.join(&href).ok().map(String::from),
                None => Url::parse(&href).ok().map(String::from),
            }
        })
}
