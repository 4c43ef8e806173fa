//! University fields from an encyclopedia article: heading, infobox
//! location and website rows.

use super::html::{doc_first, element_text, select_all, select_first};
use super::{first_of, Resolver};
use crate::core::normalize::{clean, is_sentinel, resolved, title_case};
use crate::domain::model::PartialUniversity;
use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;
use url::Url;

static CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("citation pattern"));
static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").expect("digit pattern"));
static COMPASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[NSWE]\b").expect("compass pattern"));

const LOCATION_LABELS: &[&str] = &["location", "address"];
const WEBSITE_LABELS: &[&str] = &["website"];

/// Value cell of the first infobox row whose header matches one of
/// `labels` (case-insensitive).
fn infobox_cell<'a>(document: &'a Html, labels: &[&str]) -> Option<ElementRef<'a>> {
    let infobox = doc_first(document, "table.infobox")?;
    select_all(infobox, "tr").into_iter().find_map(|row| {
        let header = select_first(row, "th")?;
        let cell = select_first(row, "td")?;
        let label = element_text(header).to_lowercase();
        labels.contains(&label.as_str()).then_some(cell)
    })
}

/// Splits a free-text location into (city, country). Citation markers,
/// digit-bearing segments and compass letters are dropped; the first and
/// last surviving segments are used.
pub fn split_location(raw: &str) -> (Option<String>, Option<String>) {
    let without_citations = CITATION.replace_all(raw, "");
    let parts: Vec<String> = without_citations
        .split(',')
        .map(clean)
        .filter(|part| !is_sentinel(part))
        .filter(|part| !DIGIT.is_match(part) && !COMPASS.is_match(part))
        .collect();

    match parts.as_slice() {
        [] => (None, None),
        [only] => (Some(title_case(only)), None),
        [first, .., last] => (Some(title_case(first)), Some(title_case(last))),
    }
}

fn location(document: &Html) -> (Option<String>, Option<String>) {
    infobox_cell(document, LOCATION_LABELS)
        .and_then(|cell| resolved(&element_text(cell)))
        .map(|raw| split_location(&raw))
        .unwrap_or((None, None))
}

/// Protocol-relative and site-relative links become absolute against the
/// article URL.
fn absolutize(href: &str, page_url: &str) -> String {
    if let Some(rest) = href.strip_prefix("//") {
        return format!("https://{}", rest);
    }
    if href.starts_with('/') {
        if let Ok(joined) = Url::parse(page_url).and_then(|base| base.join(href)) {
            return joined.to_string();
        }
    }
    href.to_string()
}

fn website(document: &Html, page_url: &str) -> Option<String> {
    let cell = infobox_cell(document, WEBSITE_LABELS)?;
    match select_first(cell, "a[href]") {
        Some(link) => link
            .value()
            .attr("href")
            .and_then(resolved)
            .map(|href| absolutize(&href, page_url)),
        None => resolved(&element_text(cell)),
    }
}

fn heading(document: &Html, css: &str) -> Option<String> {
    doc_first(document, css).and_then(|h| resolved(&element_text(h)))
}

/// Partial record from an encyclopedia article at `page_url`.
pub fn extract_university(document: &Html, page_url: &str) -> PartialUniversity {
    let name_resolvers: [Resolver<'_, String>; 2] = [
        &|| heading(document, "#firstHeading"),
        &|| heading(document, "h1"),
    ];
    let (city, country) = location(document);

    PartialUniversity {
        name: first_of(&name_resolvers),
        city,
        country,
        website: website(document, page_url),
    }
}
