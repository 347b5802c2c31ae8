use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Upper bound on secondary pages fetched per program.
pub const MAX_RELATED_PAGES: usize = 3;

static ANCHOR_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*?\bhref\s*=\s*["']([^"']+)["']"#).expect("anchor pattern compiles")
});
static ADMISSION_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)admission|requirement|entry|eligib|language|english")
        .expect("keyword pattern compiles")
});

/// Anchor `href` values in document order, deduplicated. Matching runs over
/// the raw markup so broken pages still yield links. Fragment-only and
/// `mailto:` links are dropped; values are returned exactly as written.
pub fn discover_links(html: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    ANCHOR_HREF
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|href| href.as_str().trim())
        .filter(|href| {
            !href.is_empty()
                && !href.starts_with('#')
                && !href.to_ascii_lowercase().starts_with("mailto:")
        })
        .filter(|href| seen.insert(href.to_string()))
        .map(str::to_string)
        .collect()
}

/// Origin plus path, ignoring query and fragment. Two links with the same
/// clean form are treated as the same page.
pub fn clean_url(url: &Url) -> String {
    format!("{}{}", url.origin().ascii_serialization(), url.path())
}

/// Same-host, admission-looking links worth fetching alongside the primary
/// page. Relative hrefs are resolved against `base` before the host check.
/// Keywords are matched on path and query only, so a host such as
/// `admissions.uni.example` does not qualify every link on it.
/// The primary page itself and clean-URL duplicates are skipped, and at most
/// [`MAX_RELATED_PAGES`] links are returned.
pub fn related_links(hrefs: &[String], base: &Url) -> Vec<Url> {
    let mut seen = HashSet::from([clean_url(base)]);
    hrefs
        .iter()
        .filter_map(|href| base.join(href).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .filter(|url| same_site(url, base))
        .filter(|url| is_admission_link(url))
        .filter(|url| seen.insert(clean_url(url)))
        .take(MAX_RELATED_PAGES)
        .collect()
}

fn same_site(url: &Url, base: &Url) -> bool {
    url.host_str().is_some()
        && url.host_str() == base.host_str()
        && url.port_or_known_default() == base.port_or_known_default()
}

fn is_admission_link(url: &Url) -> bool {
    ADMISSION_KEYWORD.is_match(url.path())
        || url
            .query()
            .is_some_and(|query| ADMISSION_KEYWORD.is_match(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.uni.example/programmes/msc-ai").expect("valid base")
    }

    #[test]
    fn extracts_hrefs_in_order_without_duplicates() {
        let html = r##"
            <a href="/admissions">Admissions</a>
            <A class="btn" HREF='https://www.uni.example/apply'>Apply</A>
            <a href="#top">Top</a>
            <a href="mailto:office@uni.example">Mail</a>
            <a href="/admissions">Admissions again</a>
            <a name="no-href">Anchor</a>
            <a href="/broken"  <p>unclosed
        "##;

        assert_eq!(
            discover_links(html),
            vec![
                "/admissions".to_string(),
                "https://www.uni.example/apply".to_string(),
                "/broken".to_string(),
            ]
        );
    }

    #[test]
    fn related_links_keep_same_host_admission_pages() {
        let hrefs: Vec<String> = [
            "/admissions/requirements",
            "https://other.example/entry-requirements",
            "/news/campus-life",
            "language-requirements",
            "https://www.uni.example/eligibility?lang=en",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let related = related_links(&hrefs, &base());
        let urls: Vec<&str> = related.iter().map(Url::as_str).collect();

        assert_eq!(
            urls,
            vec![
                "https://www.uni.example/admissions/requirements",
                "https://www.uni.example/programmes/language-requirements",
                "https://www.uni.example/eligibility?lang=en",
            ]
        );
    }

    #[test]
    fn related_links_cap_at_three_and_skip_clean_duplicates() {
        let hrefs: Vec<String> = [
            "/programmes/msc-ai?tab=admission",
            "/admission",
            "/admission?ref=nav",
            "/entry",
            "/english",
            "/eligibility",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let related = related_links(&hrefs, &base());
        let paths: Vec<&str> = related.iter().map(Url::path).collect();

        assert_eq!(paths, vec!["/admission", "/entry", "/english"]);
    }

    #[test]
    fn admission_words_in_the_host_do_not_qualify_links() {
        let base = Url::parse("https://admissions.uni.example/programmes/msc-ai")
            .expect("valid base");
        let hrefs = vec!["/campus/map".to_string(), "/news".to_string()];
        assert!(related_links(&hrefs, &base).is_empty());

        let hrefs = vec!["/news".to_string(), "/apply?step=requirements".to_string()];
        let related = related_links(&hrefs, &base);
        let urls: Vec<&str> = related.iter().map(Url::as_str).collect();
        assert_eq!(urls, vec!["https://admissions.uni.example/apply?step=requirements"]);
    }

    #[test]
    fn other_ports_are_other_sites() {
        let hrefs = vec![
            "https://www.uni.example:8443/admission".to_string(),
            "https://www.uni.example:443/entry".to_string(),
        ];
        let related = related_links(&hrefs, &base());
        let urls: Vec<&str> = related.iter().map(Url::as_str).collect();
        assert_eq!(urls, vec!["https://www.uni.example/entry"]);
    }
}
