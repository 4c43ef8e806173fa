//! Small query helpers over `scraper`. Invalid selectors yield nothing
//! instead of failing, so extractors stay total.

use crate::core::normalize::clean;
use scraper::{ElementRef, Html, Selector};

pub fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    let selector = match Selector::parse(css) {
        Ok(selector) => selector,
        Err(e) => {
            tracing::debug!("Invalid selector {}: {:?}", css, e);
            return Vec::new();
        }
    };
    let found = scope.select(&selector).collect();
    found
}

pub fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    let found = scope.select(&selector).next();
    found
}

pub fn doc_first<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    select_first(document.root_element(), css)
}

pub fn doc_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    select_all(document.root_element(), css)
}

/// Text nodes trimmed and joined by single spaces, then cleaned.
pub fn element_text(element: ElementRef<'_>) -> String {
    let joined = element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    clean(&joined)
}

pub fn first_text(scope: ElementRef<'_>, css: &str) -> Option<String> {
    select_first(scope, css).map(element_text)
}

/// First element after `anchor` in document order whose tag is one of
/// `names`. The anchor's own subtree is skipped.
pub fn next_element_after<'a>(
    document: &'a Html,
    anchor: ElementRef<'a>,
    names: &[&str],
) -> Option<ElementRef<'a>> {
    let anchor_id = anchor.id();
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .skip_while(|el| el.id() != anchor_id)
        .skip(1)
        .filter(|el| !el.ancestors().any(|a| a.id() == anchor_id))
        .find(|el| names.contains(&el.value().name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_text_joins_text_nodes() {
        let doc = Html::parse_document("<div><p> Hyderabad, <b>Telangana</b><sup>[1]</sup></p></div>");
        let p = doc_first(&doc, "p").unwrap();
        assert_eq!(element_text(p), "Hyderabad, Telangana [1]");
    }

    #[test]
    fn test_invalid_selector_yields_nothing() {
        let doc = Html::parse_document("<p>x</p>");
        assert!(doc_first(&doc, "p[[").is_none());
        assert!(doc_all(&doc, "p[[").is_empty());
    }

    #[test]
    fn test_next_element_after_skips_own_subtree() {
        let doc = Html::parse_document(
            "<h2>Admission <div>inner</div></h2><section><p>Entry text</p></section>",
        );
        let heading = doc_first(&doc, "h2").unwrap();
        let next = next_element_after(&doc, heading, &["p", "li", "div"]).unwrap();
        assert_eq!(element_text(next), "Entry text");
    }

    #[test]
    fn test_next_element_after_none_when_absent() {
        let doc = Html::parse_document("<p>before</p><h3>Eligibility</h3>");
        let heading = doc_first(&doc, "h3").unwrap();
        assert!(next_element_after(&doc, heading, &["p"]).is_none());
    }
}
