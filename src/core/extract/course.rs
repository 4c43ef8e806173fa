//! Course pages: name, level, discipline, duration, fees and eligibility.
//!
//! Two key/value regions feed most fields. Badges (`div.single-badge`) are
//! read in document order and a repeated title overwrites the earlier
//! value. Highlights (`div.prog-view-highli`) keep the first value seen for
//! a key.

use super::html::{doc_all, doc_first, element_text, first_text, next_element_after};
use super::{first_of, Resolver};
use crate::core::normalize::{
    clean, is_sentinel, or_sentinel, resolved, title_case, truncate_chars,
};
use crate::domain::model::{Course, Level};
use crate::utils::error::{EtlError, Result};
use regex::Regex;
use scraper::Html;
use std::collections::HashMap;
use std::sync::LazyLock;
use url::Url;

static DEGREE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:bachelor|master|ba|bsc|msc|ma|phd|doctor of|diploma in)(?:['’]?s)?\b\s*(?:(?:of|in)\b)?\s*",
    )
    .expect("degree prefix pattern")
});

const LEVEL_KEYWORDS: &[(&[&str], Level)] = &[
    (&["undergraduate", "bachelor"], Level::Bachelor),
    (&["postgraduate", "master"], Level::Master),
    (&["phd", "doctoral"], Level::PhD),
    (&["diploma"], Level::Diploma),
    (&["certificate"], Level::Certificate),
    (&["mba"], Level::Mba),
];

const LEVEL_BY_SEGMENT: &[(&str, Level)] = &[
    ("undergrad", Level::Bachelor),
    ("bachelors", Level::Bachelor),
    ("masters", Level::Master),
    ("postgrad", Level::Master),
    ("phd", Level::PhD),
    ("mba", Level::Mba),
    ("diploma", Level::Diploma),
    ("cert", Level::Certificate),
    ("foundation", Level::Foundation),
];

const ELIGIBILITY_KEYWORDS: &[&str] = &["admission", "eligibility", "entry requirement"];
const MAX_ADMISSION_PAIRS: usize = 5;
const MAX_ELIGIBILITY_CHARS: usize = 220;
const MAX_DISCIPLINE_WORDS: usize = 6;

/// Removes a title the site repeats inside its own value, either as a
/// trailing suffix or as a leading `Title:` label.
pub fn strip_badge_title(value: &str, title: &str) -> String {
    if is_sentinel(value) || is_sentinel(title) {
        return value.to_string();
    }
    let lower_value = value.to_lowercase();
    let lower_title = title.to_lowercase();

    if lower_value.ends_with(&lower_title) {
        let keep = value
            .chars()
            .count()
            .saturating_sub(title.chars().count());
        return clean(&value.chars().take(keep).collect::<String>());
    }

    if lower_value.starts_with(&format!("{}:", lower_title)) {
        let skip = title.chars().count() + 1;
        return clean(&value.chars().skip(skip).collect::<String>());
    }

    value.to_string()
}

/// Lower-cased badge title → value. Later badges overwrite earlier ones.
pub fn extract_badges(document: &Html) -> HashMap<String, String> {
    let mut badges = HashMap::new();
    for badge in doc_all(document, "div.single-badge") {
        let (Some(title), Some(value)) = (
            first_text(badge, "span.single-badge-title"),
            first_text(badge, "div.badge-description h3"),
        ) else {
            continue;
        };
        let value = strip_badge_title(&value, &title);
        badges.insert(title.to_lowercase(), value);
    }
    badges
}

/// Lower-cased highlight heading → value. The first value for a key wins.
pub fn extract_highlights(document: &Html) -> HashMap<String, String> {
    let mut highlights = HashMap::new();
    for block in doc_all(document, "div.prog-view-highli") {
        let (Some(key), Some(value)) = (first_text(block, "h3"), first_text(block, "p")) else {
            continue;
        };
        if is_sentinel(&key) || is_sentinel(&value) {
            continue;
        }
        highlights.entry(key.to_lowercase()).or_insert(value);
    }
    highlights
}

/// First key in `keys` holding a resolved value.
fn lookup(map: &HashMap<String, String>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| map.get(*key).and_then(|v| resolved(v)))
}

pub fn level_from_text(text: &str) -> Option<Level> {
    let text = text.to_lowercase();
    LEVEL_KEYWORDS
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| text.contains(n)))
        .map(|(_, level)| *level)
}

/// Third path segment, e.g. `masters` in `/universities/x/masters/y`.
pub fn tier_segment(url: &Url) -> Option<String> {
    let parts: Vec<&str> = url.path().trim_matches('/').split('/').collect();
    parts.get(2).map(|s| s.to_lowercase())
}

pub fn level_from_url(url: &Url) -> Option<Level> {
    let segment = tier_segment(url)?;
    LEVEL_BY_SEGMENT
        .iter()
        .find(|(name, _)| *name == segment)
        .map(|(_, level)| *level)
}

pub fn classify_level(signal: Option<&str>, url: &Url) -> Option<Level> {
    signal
        .and_then(level_from_text)
        .or_else(|| level_from_url(url))
}

/// Course name with a leading degree phrase removed, when what remains is
/// short enough to be a subject.
pub fn discipline_from_name(name: &str) -> Option<String> {
    let name = resolved(name)?;
    let remainder = DEGREE_PREFIX.replace(&name, "");
    let remainder = remainder.trim();
    if remainder.is_empty() || remainder.split_whitespace().count() > MAX_DISCIPLINE_WORDS {
        return None;
    }
    resolved(&title_case(remainder))
}

pub fn discipline_from_url(url: &Url) -> Option<String> {
    let slug = url.path().trim_end_matches('/').rsplit('/').next()?;
    resolved(&title_case(&slug.replace('-', " ")))
}

fn admission_pairs(document: &Html) -> Option<String> {
    let pairs: Vec<String> = doc_all(document, "div.univ-entry")
        .into_iter()
        .filter_map(|block| {
            let label = first_text(block, ".univ-entry-label").and_then(|t| resolved(&t))?;
            let value = first_text(block, ".univ-entry-value").and_then(|t| resolved(&t))?;
            Some(format!("{}: {}", label, value))
        })
        .take(MAX_ADMISSION_PAIRS)
        .collect();

    (!pairs.is_empty()).then(|| pairs.join("; "))
}

fn admission_section(document: &Html) -> Option<String> {
    doc_all(document, "h2, h3, h4")
        .into_iter()
        .filter(|heading| {
            let text = element_text(*heading).to_lowercase();
            ELIGIBILITY_KEYWORDS.iter().any(|k| text.contains(k))
        })
        .find_map(|heading| {
            let block = next_element_after(document, heading, &["p", "li", "div"])?;
            resolved(&element_text(block)).map(|s| truncate_chars(&s, MAX_ELIGIBILITY_CHARS))
        })
}

pub fn extract_eligibility(document: &Html) -> Option<String> {
    admission_pairs(document).or_else(|| admission_section(document))
}

/// Builds a course record from one page. `course_id` is left empty; the
/// assembler numbers courses once the table is final.
pub fn extract_course(html: &str, course_url: &str, university_id: &str) -> Result<Course> {
    let url = Url::parse(course_url).map_err(|e| EtlError::ExtractionError {
        url: course_url.to_string(),
        message: format!("invalid course URL: {}", e),
    })?;
    let document = Html::parse_document(html);

    let course_name = doc_first(&document, "h1")
        .map(element_text)
        .unwrap_or_else(|| clean(""));
    let badges = extract_badges(&document);
    let highlights = extract_highlights(&document);

    let level = classify_level(highlights.get("study level").map(String::as_str), &url);

    let discipline_resolvers: [Resolver<'_, String>; 4] = [
        &|| lookup(&highlights, &["main subject"]),
        &|| lookup(&badges, &["main subject area"]),
        &|| discipline_from_name(&course_name),
        &|| discipline_from_url(&url),
    ];
    let discipline = title_case(&or_sentinel(first_of(&discipline_resolvers)));

    let duration = or_sentinel(lookup(&badges, &["programme duration", "duration"]));
    let fees = or_sentinel(lookup(&badges, &["tuition fee/year", "tuition fee"]));
    let eligibility = or_sentinel(extract_eligibility(&document));

    tracing::debug!(
        "Extracted course '{}' level={:?} from {}",
        course_name,
        level,
        course_url
    );

    Ok(Course {
        course_id: String::new(),
        university_id: university_id.to_string(),
        course_name,
        level: or_sentinel(level.map(|l| l.to_string())),
        discipline,
        duration,
        fees,
        eligibility,
    })
}
