//! University fields from the ranking site, which embeds schema.org
//! JSON-LD blocks.

use super::{first_of, Resolver};
use super::html::{doc_all, doc_first, element_text};
use crate::core::normalize::{resolved, title_case};
use crate::domain::model::PartialUniversity;
use scraper::Html;
use serde_json::Value;

const PROFILE_PAGE: &str = "ProfilePage";
const ORGANIZATION: &str = "CollegeOrUniversity";

/// Every JSON-LD object on the page; a top-level array contributes its
/// elements. Malformed blocks are skipped.
pub fn structured_blocks(document: &Html) -> Vec<Value> {
    let mut objects = Vec::new();
    for script in doc_all(document, r#"script[type="application/ld+json"]"#) {
        let raw = script.text().collect::<String>();
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => objects.extend(items),
            Ok(value) => objects.push(value),
            Err(e) => tracing::debug!("Skipping malformed JSON-LD block: {}", e),
        }
    }
    objects
}

fn has_type(object: &Value, wanted: &str) -> bool {
    match object.get("@type") {
        Some(Value::String(t)) => t == wanted,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(wanted)),
        _ => false,
    }
}

/// Strings and numbers as text; objects by their `name`.
fn json_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => resolved(s),
        Value::Number(n) => resolved(&n.to_string()),
        Value::Object(map) => json_text(map.get("name")),
        _ => None,
    }
}

type Location = (Option<String>, Option<String>);

/// First department exposing both locality and country; failing that, the
/// first exposing either.
fn department_location(organization: &Value) -> Option<Location> {
    let departments = organization.get("department")?.as_array()?;
    let candidates: Vec<Location> = departments
        .iter()
        .filter_map(|department| department.get("address"))
        .filter(|address| address.is_object())
        .map(|address| {
            (
                json_text(address.get("addressLocality")),
                json_text(address.get("addressCountry")),
            )
        })
        .collect();

    candidates
        .iter()
        .find(|(city, country)| city.is_some() && country.is_some())
        .or_else(|| {
            candidates
                .iter()
                .find(|(city, country)| city.is_some() || country.is_some())
        })
        .map(|(city, country)| {
            (
                city.as_deref().map(title_case),
                country.as_deref().map(title_case),
            )
        })
}

fn structured_fields(blocks: &[Value]) -> PartialUniversity {
    let mut partial = PartialUniversity::default();

    // 後出現的物件覆蓋前面的名稱
    for object in blocks.iter().filter(|o| o.is_object()) {
        if has_type(object, PROFILE_PAGE) {
            if let Some(entity) = object.get("mainEntity").filter(|e| e.is_object()) {
                if let Some(name) =
                    json_text(entity.get("name")).or_else(|| json_text(object.get("name")))
                {
                    partial.name = Some(name);
                }
            }
        }

        if has_type(object, ORGANIZATION) {
            if let Some(name) = json_text(object.get("name")) {
                partial.name = Some(name);
            }
            if let Some((city, country)) = department_location(object) {
                partial.city = city;
                partial.country = country;
            }
        }
    }

    partial
}

fn heading_name(document: &Html) -> Option<String> {
    doc_first(document, "h1").and_then(|h1| resolved(&element_text(h1)))
}

/// Name, city and country from a ranking-site university page. The
/// ranking site never exposes a website.
pub fn extract_university(document: &Html) -> PartialUniversity {
    let blocks = structured_blocks(document);
    let structured = structured_fields(&blocks);

    let name_resolvers: [Resolver<'_, String>; 2] =
        [&|| structured.name.clone(), &|| heading_name(document)];

    PartialUniversity {
        name: first_of(&name_resolvers),
        city: structured.city,
        country: structured.country,
        website: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(jsonld: &str, body: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><head><script type="application/ld+json">{}</script></head><body>{}</body></html>"#,
            jsonld, body
        ))
    }

    #[test]
    fn test_organization_block_with_department_address() {
        let doc = page(
            r#"{"@type":"CollegeOrUniversity","name":"University of Hyderabad",
                "department":[
                    {"name":"Main","address":{"addressLocality":"hyderabad","addressCountry":"india"}}
                ]}"#,
            "<h1>Ignored heading</h1>",
        );
        let partial = extract_university(&doc);
        assert_eq!(partial.name.as_deref(), Some("University of Hyderabad"));
        assert_eq!(partial.city.as_deref(), Some("Hyderabad"));
        assert_eq!(partial.country.as_deref(), Some("India"));
        assert_eq!(partial.website, None);
    }

    #[test]
    fn test_prefers_department_with_both_fields() {
        let doc = page(
            r#"[{"@type":"CollegeOrUniversity","name":"Osmania University",
                "department":[
                    {"address":{"addressLocality":"Secunderabad"}},
                    "not-an-object",
                    {"address":{"addressLocality":"Hyderabad","addressCountry":{"@type":"Country","name":"India"}}}
                ]}]"#,
            "",
        );
        let partial = extract_university(&doc);
        assert_eq!(partial.city.as_deref(), Some("Hyderabad"));
        assert_eq!(partial.country.as_deref(), Some("India"));
    }

    #[test]
    fn test_single_field_department_used_when_nothing_better() {
        let doc = page(
            r#"{"@type":"CollegeOrUniversity","name":"X",
                "department":[{"address":{"addressCountry":"India"}}]}"#,
            "",
        );
        let partial = extract_university(&doc);
        assert_eq!(partial.city, None);
        assert_eq!(partial.country.as_deref(), Some("India"));
    }

    #[test]
    fn test_profile_page_main_entity_name() {
        let doc = page(
            r#"{"@type":"ProfilePage","name":"Profile","mainEntity":{"name":"  IIT   Mandi "}}"#,
            "<h1>Heading</h1>",
        );
        let partial = extract_university(&doc);
        assert_eq!(partial.name.as_deref(), Some("IIT Mandi"));
        assert_eq!(partial.city, None);
    }

    #[test]
    fn test_malformed_json_falls_back_to_heading() {
        let doc = page("{not json", "<h1> National Institute of Technology Calicut </h1>");
        let partial = extract_university(&doc);
        assert_eq!(
            partial.name.as_deref(),
            Some("National Institute of Technology Calicut")
        );
        assert_eq!(partial.country, None);
    }

    #[test]
    fn test_empty_page_resolves_nothing() {
        let doc = Html::parse_document("<html><body></body></html>");
        assert_eq!(extract_university(&doc), PartialUniversity::default());
    }
}
