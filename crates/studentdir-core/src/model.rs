//! Student profile records.
//!
//! A [`StudentRecord`] is read-only once it is part of a roster. Every list
//! field deserializes to an empty list when absent, so the query engine never
//! has to distinguish "missing" from "empty".

use serde::{Deserialize, Serialize};

use crate::semester;

/// One student profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Unique identifier within the roster.
    pub id: String,

    /// Display name, usually "First Last".
    pub name: String,

    #[serde(default)]
    pub email: String,

    /// Graduation class year (e.g. 2026).
    pub class_year: u16,

    pub major: String,

    #[serde(default)]
    pub minor: Option<String>,

    /// Course history grouped by semester, oldest first.
    #[serde(default)]
    pub courses: Vec<SemesterCourses>,

    #[serde(default)]
    pub hometown: String,

    /// Residence hall.
    #[serde(default)]
    pub dorm: String,

    #[serde(default)]
    pub clubs: Vec<String>,

    #[serde(default)]
    pub sports: Vec<String>,

    #[serde(default)]
    pub hobbies: Vec<String>,

    #[serde(default)]
    pub career_interests: Vec<String>,

    #[serde(default)]
    pub internships: Vec<Internship>,

    #[serde(default)]
    pub profile_photo_url: Option<String>,

    #[serde(default)]
    pub social: Option<SocialLinks>,
}

/// Courses taken during one semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterCourses {
    /// Semester label such as `FA25` or `SP26`.
    pub semester: String,

    #[serde(default)]
    pub classes: Vec<String>,
}

/// A past or current internship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Internship {
    pub company: String,
    #[serde(default)]
    pub role: String,
}

/// Optional social profile links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub snapchat: Option<String>,
    #[serde(default)]
    pub facebook: Option<String>,
}

impl SocialLinks {
    /// Whether no link is set.
    pub fn is_empty(&self) -> bool {
        self.linkedin.is_none()
            && self.twitter.is_none()
            && self.instagram.is_none()
            && self.snapchat.is_none()
            && self.facebook.is_none()
    }
}

impl StudentRecord {
    /// Last whitespace-delimited token of the trimmed display name.
    ///
    /// A single-token name is its own last name; a blank name yields `""`.
    pub fn last_name(&self) -> &str {
        last_name_of(&self.name)
    }

    /// Up to two initials taken from the space-separated name parts.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .collect()
    }

    /// Every course name across all semesters, in history order.
    pub fn all_classes(&self) -> impl Iterator<Item = &str> {
        self.courses
            .iter()
            .flat_map(|s| s.classes.iter().map(String::as_str))
    }

    /// Courses of the most recent parseable semester, if any.
    pub fn current_classes(&self) -> Option<&SemesterCourses> {
        let labels = self.courses.iter().map(|s| s.semester.as_str());
        let latest = semester::most_recent_semester(labels)?;
        self.courses.iter().find(|s| s.semester.trim() == latest)
    }

    /// Every company the student interned at.
    pub fn companies(&self) -> impl Iterator<Item = &str> {
        self.internships.iter().map(|i| i.company.as_str())
    }
}

/// Last whitespace-delimited token of a trimmed name.
pub fn last_name_of(name: &str) -> &str {
    name.split_whitespace().next_back().unwrap_or("")
}
