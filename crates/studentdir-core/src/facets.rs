//! Selectable options for each directory filter.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::StudentRecord;
use crate::query::collate;

/// Distinct values present in a roster, one list per filter category.
///
/// Text lists are in collation order; class years are newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    pub class_years: Vec<u16>,
    pub majors: Vec<String>,
    pub minors: Vec<String>,
    pub dorms: Vec<String>,
    pub hometowns: Vec<String>,
    pub courses: Vec<String>,
    pub companies: Vec<String>,
    pub clubs: Vec<String>,
    pub sports: Vec<String>,
    pub interests: Vec<String>,
}

impl Facets {
    pub fn from_roster(students: &[StudentRecord]) -> Self {
        let class_years: BTreeSet<Reverse<u16>> =
            students.iter().map(|s| Reverse(s.class_year)).collect();

        Self {
            class_years: class_years.into_iter().map(|Reverse(y)| y).collect(),
            majors: distinct(students.iter().map(|s| s.major.as_str())),
            minors: distinct(students.iter().filter_map(|s| s.minor.as_deref())),
            dorms: distinct(students.iter().map(|s| s.dorm.as_str())),
            hometowns: distinct(students.iter().map(|s| s.hometown.as_str())),
            courses: distinct(students.iter().flat_map(|s| s.all_classes())),
            companies: distinct(students.iter().flat_map(|s| s.companies())),
            clubs: distinct(students.iter().flat_map(|s| s.clubs.iter().map(String::as_str))),
            sports: distinct(students.iter().flat_map(|s| s.sports.iter().map(String::as_str))),
            interests: distinct(
                students
                    .iter()
                    .flat_map(|s| s.career_interests.iter().map(String::as_str)),
            ),
        }
    }
}

/// De-duplicate exactly, skip blanks, then order by [`collate`].
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let unique: BTreeSet<&str> = values.filter(|v| !v.trim().is_empty()).collect();
    let mut out: Vec<String> = unique.into_iter().map(str::to_string).collect();
    out.sort_by(|a, b| collate(a, b));
    out
}
