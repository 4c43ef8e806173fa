use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder for a field that could not be resolved.
pub const SENTINEL: &str = "N/A";

/// One configured target: the ranking-site slug and its encyclopedia page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversityTarget {
    pub slug: String,
    pub encyclopedia_url: String,
}

/// Per-source extraction result. `None` means the source gave no signal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialUniversity {
    pub name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct University {
    pub university_id: String,
    pub university_name: String,
    pub country: String,
    pub city: String,
    pub website: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Bachelor,
    Master,
    PhD,
    Mba,
    Diploma,
    Certificate,
    Foundation,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Bachelor => "Bachelor",
            Level::Master => "Master",
            Level::PhD => "PhD",
            Level::Mba => "MBA",
            Level::Diploma => "Diploma",
            Level::Certificate => "Certificate",
            Level::Foundation => "Foundation",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub course_id: String,
    pub university_id: String,
    pub course_name: String,
    pub level: String,
    pub discipline: String,
    pub duration: String,
    pub fees: String,
    pub eligibility: String,
}

/// Output of the extract phase: retained universities and accepted courses,
/// in intake order, before table-level cleanup.
#[derive(Debug, Clone, Default)]
pub struct Harvest {
    pub universities: Vec<University>,
    pub courses: Vec<Course>,
}

/// The two relational tables ready to be written.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Tables {
    pub universities: Vec<University>,
    pub courses: Vec<Course>,
}

pub fn university_id(index: usize) -> String {
    format!("U{:03}", index)
}

pub fn course_id(index: usize) -> String {
    format!("C{:04}", index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_formats() {
        assert_eq!(university_id(1), "U001");
        assert_eq!(university_id(12), "U012");
        assert_eq!(course_id(1), "C0001");
        assert_eq!(course_id(250), "C0250");
    }

    #[test]
    fn test_level_display() {
        assert_eq!(Level::Mba.to_string(), "MBA");
        assert_eq!(Level::PhD.to_string(), "PhD");
    }
}
