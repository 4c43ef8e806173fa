//! Course-page discovery on a ranking-site university page.

use super::html::doc_all;
use crate::core::normalize::resolved;
use scraper::Html;
use std::collections::HashSet;
use url::Url;

/// Third path segment of a course URL naming the program tier.
pub const PROGRAM_TIER_SEGMENTS: &[&str] = &[
    "undergrad",
    "bachelors",
    "masters",
    "phd",
    "postgrad",
    "mba",
    "diploma",
    "cert",
    "foundation",
];

fn strip_query_and_fragment(href: &str) -> &str {
    let end = href.find(['?', '#']).unwrap_or(href.len());
    href[..end].trim()
}

fn is_program_path(path: &str, slug: &str) -> bool {
    if !path.starts_with(&format!("/universities/{}/", slug)) {
        return false;
    }
    let parts: Vec<&str> = path.trim_matches('/').split('/').collect();
    parts.len() >= 4 && PROGRAM_TIER_SEGMENTS.contains(&parts[2].to_lowercase().as_str())
}

/// Absolute course URLs for `slug`, first-seen order, no repeats.
pub fn program_links(document: &Html, slug: &str, base_url: &str) -> Vec<String> {
    let base = match Url::parse(base_url) {
        Ok(base) => base,
        Err(e) => {
            tracing::warn!("Invalid base URL {}: {}", base_url, e);
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in doc_all(document, "a[href]") {
        let Some(href) = anchor.value().attr("href").and_then(resolved) else {
            continue;
        };
        let path = strip_query_and_fragment(&href);
        if !is_program_path(path, slug) {
            continue;
        }
        let Ok(absolute) = base.join(path) else {
            continue;
        };
        let absolute = absolute.to_string();
        if seen.insert(absolute.clone()) {
            links.push(absolute);
        }
    }

    links
}
