//! Link extraction for the listing page
//!
//! Pulls `<a href>` targets out of the rendered listing and reduces them to
//! site paths on the preview service.

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::{Position, Url};

/// Extracts preview links from listing HTML
///
/// # Link Rules
///
/// **Include:**
/// - `<a href="...">` targets that resolve to the same origin as `root`
///   and whose path starts with `prefix`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - Fragment-only links
/// - Links to other origins
///
/// Results keep first-seen order and are de-duplicated by exact string.
///
/// # Example
///
/// ```
/// use preview_sweep::targets::extract_preview_links;
/// use url::Url;
///
/// let html = r#"<a href="/u/org/repo/v1">Repo</a><a href="/about">About</a>"#;
/// let root = Url::parse("https://preview.door43.org").unwrap();
/// let links = extract_preview_links(html, &root, "/u/");
/// assert_eq!(links, vec!["/u/org/repo/v1".to_string()]);
/// ```
pub fn extract_preview_links(html: &str, root: &Url, prefix: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(path) = to_site_path(href, root) else {
            continue;
        };

        if path.starts_with(prefix) && seen.insert(path.clone()) {
            links.push(path);
        }
    }

    links
}

/// Resolves an href against the root and returns its path, query and fragment
///
/// Returns None for hrefs that should never be visited or that leave the site.
fn to_site_path(href: &str, root: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let resolved = root.join(href).ok()?;
    if resolved.origin() != root.origin() {
        return None;
    }

    Some(resolved[Position::BeforePath..].to_string())
}
