// Text patterns for the listing page, the metadata page and hosting pages

use regex::Regex;
use std::sync::LazyLock;

static LISTING_ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<td><a href="/pypi/([\w-]+)"#).unwrap());

// Everything from the key up to, not including, the next closing brace.
static PROJECT_URLS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"project_urls[^}]*").unwrap());

// The class is deliberately `[-_a-zA-Z/.d]`: a literal `d`, not `\d`.
static HOMEPAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Homepage&#34;: &#34;(https://git[-_a-zA-Z/.d]+)").unwrap());
static REPOSITORY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Repository&#34;: &#34;(https://git[-_a-zA-Z/.d]+)").unwrap());

/// Extract package identifiers from listing rows of the form
/// `<td><a href="/pypi/<id>`, in document order.
pub fn extract_candidate_ids(page: &str) -> Vec<String> {
    LISTING_ROW_RE
        .captures_iter(page)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// The first `project_urls` block of a metadata page, if there is one.
pub fn project_urls_block(page: &str) -> Option<&str> {
    PROJECT_URLS_RE.find(page).map(|m| m.as_str())
}

pub fn homepage_link(block: &str) -> Option<&str> {
    first_capture(&HOMEPAGE_RE, block)
}

pub fn repository_link(block: &str) -> Option<&str> {
    first_capture(&REPOSITORY_RE, block)
}

fn first_capture<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Hosting links advertised by a metadata page.
///
/// Homepage first, then Repository when it differs from Homepage. A page
/// without a `project_urls` block yields nothing.
pub fn extract_hosting_links(page: &str) -> Vec<String> {
    let Some(block) = project_urls_block(page) else {
        return Vec::new();
    };

    let mut links = Vec::with_capacity(2);
    let homepage = homepage_link(block);
    if let Some(home) = homepage {
        links.push(home.to_string());
    }
    if let Some(repo) = repository_link(block)
        && homepage != Some(repo)
    {
        links.push(repo.to_string());
    }
    links
}

/// Literal substring test; the marker is never treated as a pattern.
pub fn contains_marker(page: &str, marker: &str) -> bool {
    page.contains(marker)
}
