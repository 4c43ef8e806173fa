//! Deduplication and relational assembly of the two output tables.

use crate::core::normalize::{clean, title_case};
use crate::domain::model::{course_id, Course, Harvest, Tables, University, SENTINEL};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::is_absolute_http_url;
use std::collections::HashSet;

type CourseKey = (String, String, String);

/// Case-insensitive (university, name, level) keys of accepted courses.
/// Shared across every target of a run.
#[derive(Debug, Clone, Default)]
pub struct CourseKeys {
    seen: HashSet<CourseKey>,
}

impl CourseKeys {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(course: &Course) -> CourseKey {
        (
            course.university_id.to_lowercase(),
            course.course_name.to_lowercase(),
            course.level.to_lowercase(),
        )
    }

    pub fn contains(&self, course: &Course) -> bool {
        self.seen.contains(&Self::key(course))
    }

    /// Returns false when an equal key was already recorded.
    pub fn insert(&mut self, course: &Course) -> bool {
        self.seen.insert(Self::key(course))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Normalizes every column and drops repeated (name, country, city) rows,
/// keeping the first.
pub fn clean_universities(universities: Vec<University>) -> Vec<University> {
    let mut seen = HashSet::new();
    universities
        .into_iter()
        .map(|u| {
            let website = clean(&u.website);
            University {
                university_id: clean(&u.university_id),
                university_name: clean(&u.university_name),
                country: title_case(&u.country),
                city: title_case(&u.city),
                website: if is_absolute_http_url(&website) {
                    website
                } else {
                    SENTINEL.to_string()
                },
            }
        })
        .filter(|u| {
            seen.insert((
                u.university_name.clone(),
                u.country.clone(),
                u.city.clone(),
            ))
        })
        .collect()
}

fn renumber(courses: Vec<Course>) -> Vec<Course> {
    courses
        .into_iter()
        .enumerate()
        .map(|(i, course)| Course {
            course_id: course_id(i + 1),
            ..course
        })
        .collect()
}

/// Normalizes columns, drops case-insensitive duplicates (first wins) and
/// assigns provisional identifiers.
pub fn clean_courses(courses: Vec<Course>) -> Vec<Course> {
    let mut keys = CourseKeys::new();
    let unique = courses
        .into_iter()
        .map(|c| Course {
            course_id: c.course_id,
            university_id: clean(&c.university_id),
            course_name: clean(&c.course_name),
            level: clean(&c.level),
            discipline: title_case(&c.discipline),
            duration: clean(&c.duration),
            fees: clean(&c.fees),
            eligibility: clean(&c.eligibility),
        })
        .filter(|c| keys.insert(c))
        .collect();
    renumber(unique)
}

/// Drops courses whose university is not in the table and renumbers the
/// rest from `C0001` without gaps.
pub fn enforce_integrity(universities: &[University], courses: Vec<Course>) -> Vec<Course> {
    let valid: HashSet<&str> = universities
        .iter()
        .map(|u| u.university_id.as_str())
        .collect();
    let before = courses.len();
    let kept: Vec<Course> = courses
        .into_iter()
        .filter(|c| valid.contains(c.university_id.as_str()))
        .collect();
    if kept.len() < before {
        tracing::info!("Dropped {} orphaned course(s)", before - kept.len());
    }
    renumber(kept)
}

/// Builds the final tables. An empty table is an error: a partial artifact
/// would break referential integrity.
pub fn assemble(harvest: Harvest) -> Result<Tables> {
    let universities = clean_universities(harvest.universities);
    if universities.is_empty() {
        return Err(EtlError::EmptyResult {
            table: "university".to_string(),
        });
    }

    let courses = clean_courses(harvest.courses);
    let courses = enforce_integrity(&universities, courses);
    if courses.is_empty() {
        return Err(EtlError::EmptyResult {
            table: "course".to_string(),
        });
    }

    Ok(Tables {
        universities,
        courses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn university(id: &str, name: &str, city: &str) -> University {
        University {
            university_id: id.to_string(),
            university_name: name.to_string(),
            country: "India".to_string(),
            city: city.to_string(),
            website: "https://example.ac.in".to_string(),
        }
    }

    fn course(university_id: &str, name: &str, level: &str) -> Course {
        Course {
            course_id: String::new(),
            university_id: university_id.to_string(),
            course_name: name.to_string(),
            level: level.to_string(),
            discipline: "computer science".to_string(),
            duration: "2 Years".to_string(),
            fees: SENTINEL.to_string(),
            eligibility: SENTINEL.to_string(),
        }
    }

    #[test]
    fn test_university_dedup_keeps_first() {
        let rows = clean_universities(vec![
            university("U001", "University of Hyderabad", "Hyderabad"),
            university("U002", "University of Hyderabad", "hyderabad"),
            university("U003", "Osmania University", "Hyderabad"),
        ]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].university_id, "U001");
        assert_eq!(rows[1].university_id, "U003");
    }

    #[test]
    fn test_university_website_must_be_absolute() {
        let mut relative = university("U001", "A", "Hyderabad");
        relative.website = "www.unom.ac.in".to_string();
        let mut blank = university("U002", "B", "Chennai");
        blank.website = "  ".to_string();
        let rows = clean_universities(vec![relative, blank]);
        assert_eq!(rows[0].website, SENTINEL);
        assert_eq!(rows[1].website, SENTINEL);
    }

    #[test]
    fn test_course_dedup_is_case_insensitive() {
        let rows = clean_courses(vec![
            course("U001", "MSc Physics", "Master"),
            course("U001", "msc physics", "MASTER"),
            course("U002", "MSc Physics", "Master"),
        ]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].course_name, "MSc Physics");
        assert_eq!(rows[0].course_id, "C0001");
        assert_eq!(rows[1].university_id, "U002");
        assert_eq!(rows[1].course_id, "C0002");
        assert_eq!(rows[0].discipline, "Computer Science");
    }

    #[test]
    fn test_integrity_filter_renumbers_contiguously() {
        let universities = vec![university("U001", "A", "X"), university("U003", "C", "Z")];
        let courses = clean_courses(vec![
            course("U001", "One", "Master"),
            course("U002", "Two", "Master"),
            course("U003", "Three", "PhD"),
        ]);
        let kept = enforce_integrity(&universities, courses);
        let ids: Vec<&str> = kept.iter().map(|c| c.course_id.as_str()).collect();
        assert_eq!(ids, vec!["C0001", "C0002"]);
        assert!(kept
            .iter()
            .all(|c| universities.iter().any(|u| u.university_id == c.university_id)));
    }

    #[test]
    fn test_assemble_empty_universities_is_error() {
        let err = assemble(Harvest::default()).unwrap_err();
        assert!(matches!(err, EtlError::EmptyResult { ref table } if table == "university"));
    }

    #[test]
    fn test_assemble_orphans_only_is_error() {
        let harvest = Harvest {
            universities: vec![university("U001", "A", "X")],
            courses: vec![course("U009", "Orphan", "Master")],
        };
        let err = assemble(harvest).unwrap_err();
        assert!(matches!(err, EtlError::EmptyResult { ref table } if table == "course"));
    }

    #[test]
    fn test_duplicate_university_orphans_its_courses() {
        let harvest = Harvest {
            universities: vec![
                university("U001", "Same", "Hyderabad"),
                university("U002", "Same", "Hyderabad"),
            ],
            courses: vec![
                course("U001", "Kept", "Master"),
                course("U002", "Dropped", "Master"),
            ],
        };
        let tables = assemble(harvest).unwrap();
        assert_eq!(tables.universities.len(), 1);
        assert_eq!(tables.courses.len(), 1);
        assert_eq!(tables.courses[0].course_name, "Kept");
        assert_eq!(tables.courses[0].course_id, "C0001");
    }

    #[test]
    fn test_course_keys() {
        let mut keys = CourseKeys::new();
        assert!(keys.is_empty());
        assert!(keys.insert(&course("U001", "MBA", "MBA")));
        assert!(keys.contains(&course("u001", "mba", "mba")));
        assert!(!keys.insert(&course("U001", "Mba", "Mba")));
        assert_eq!(keys.len(), 1);
    }
}
