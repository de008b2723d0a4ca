//! Multi-criteria roster filter.
//!
//! All active predicates must hold (AND across categories). A [`Filter`] is
//! compiled once per query so search terms are lowercased a single time.

use crate::model::StudentRecord;

use super::QueryParams;

/// A compiled set of predicates for one [`QueryParams`].
#[derive(Debug)]
pub struct Filter<'p> {
    params: &'p QueryParams,
    name: String,
    courses: Vec<String>,
    companies: Vec<String>,
    clubs: Vec<String>,
    sports: Vec<String>,
    interests: Vec<String>,
}

impl<'p> Filter<'p> {
    pub fn new(params: &'p QueryParams) -> Self {
        Self {
            params,
            name: params.name.trim().to_lowercase(),
            courses: lowercase_all(&params.courses),
            companies: lowercase_all(&params.companies),
            clubs: lowercase_all(&params.clubs),
            sports: lowercase_all(&params.sports),
            interests: lowercase_all(&params.interests),
        }
    }

    /// Whether `student` satisfies every active predicate.
    pub fn matches(&self, student: &StudentRecord) -> bool {
        let p = self.params;

        if p.exclude_id.as_deref() == Some(student.id.as_str()) {
            return false;
        }
        if !self.name.is_empty() && !student.name.to_lowercase().contains(&self.name) {
            return false;
        }

        if !p.class_years.is_empty() && !p.class_years.contains(&student.class_year) {
            return false;
        }
        if !p.majors.is_empty() && !p.majors.contains(&student.major) {
            return false;
        }
        if !p.minors.is_empty() {
            match &student.minor {
                Some(minor) if p.minors.contains(minor) => {}
                _ => return false,
            }
        }
        if !p.dorms.is_empty() && !p.dorms.contains(&student.dorm) {
            return false;
        }
        if !p.hometowns.is_empty() && !p.hometowns.contains(&student.hometown) {
            return false;
        }

        every_term_found(&self.courses, student.all_classes())
            && every_term_found(&self.companies, student.companies())
            && every_term_found(&self.clubs, student.clubs.iter().map(String::as_str))
            && every_term_found(&self.sports, student.sports.iter().map(String::as_str))
            && every_term_found(
                &self.interests,
                student.career_interests.iter().map(String::as_str),
            )
    }
}

/// Students matching `params`, in roster order.
pub fn filter<'a>(students: &'a [StudentRecord], params: &QueryParams) -> Vec<&'a StudentRecord> {
    let filter = Filter::new(params);
    students.iter().filter(|s| filter.matches(s)).collect()
}

fn lowercase_all(terms: &[String]) -> Vec<String> {
    terms.iter().map(|t| t.to_lowercase()).collect()
}

/// True if `terms` is empty, or every term is a substring of some entry.
///
/// `terms` must already be lowercased; entries are lowercased here.
fn every_term_found<'e, I>(terms: &[String], entries: I) -> bool
where
    I: Iterator<Item = &'e str>,
{
    if terms.is_empty() {
        return true;
    }
    let entries: Vec<String> = entries.map(str::to_lowercase).collect();
    terms
        .iter()
        .all(|term| entries.iter().any(|entry| entry.contains(term.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Internship, SemesterCourses};
    use pretty_assertions::assert_eq;

    fn base(id: &str, name: &str) -> StudentRecord {
        StudentRecord {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{id}@example.edu"),
            class_year: 2026,
            major: "Computer Science".to_string(),
            minor: None,
            courses: Vec::new(),
            hometown: "South Bend, IN".to_string(),
            dorm: "Keough Hall".to_string(),
            clubs: Vec::new(),
            sports: Vec::new(),
            hobbies: Vec::new(),
            career_interests: Vec::new(),
            internships: Vec::new(),
            profile_photo_url: None,
            social: None,
        }
    }

    fn sample() -> Vec<StudentRecord> {
        let mut a = base("a", "Amy Zephyr");
        a.courses = vec![
            SemesterCourses {
                semester: "FA25".to_string(),
                classes: vec!["Intro to Databases".to_string()],
            },
            SemesterCourses {
                semester: "SP26".to_string(),
                classes: vec!["Compilers".to_string()],
            },
        ];
        a.clubs = vec!["Chess Club".to_string(), "Robotics".to_string()];
        a.internships = vec![Internship {
            company: "Acme Corp".to_string(),
            role: "SWE Intern".to_string(),
        }];
        a.minor = Some("Data Science".to_string());

        let mut b = base("b", "Bob Young");
        b.class_year = 2027;
        b.major = "Finance".to_string();
        b.dorm = "Walsh Hall".to_string();
        b.courses = vec![SemesterCourses {
            semester: "FA25".to_string(),
            classes: vec!["Accounting".to_string()],
        }];
        b.sports = vec!["Rowing".to_string()];

        let mut c = base("c", "Cara Smith");
        c.clubs = vec!["Chess Club".to_string()];
        c.career_interests = vec!["Venture Capital".to_string()];

        vec![a, b, c]
    }

    fn ids(result: &[&StudentRecord]) -> Vec<String> {
        result.iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn test_empty_params_match_everything() {
        let roster = sample();
        let result = filter(&roster, &QueryParams::default());
        assert_eq!(ids(&result), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_name_filter_case_insensitive_and_trimmed() {
        let roster = sample();
        let params = QueryParams {
            name: "  ZEPH ".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&roster, &params)), vec!["a"]);
    }

    #[test]
    fn test_course_filter_substring_across_semesters() {
        let roster = sample();
        let params = QueryParams {
            courses: vec!["data".to_string()],
            ..Default::default()
        };
        assert_eq!(ids(&filter(&roster, &params)), vec!["a"]);

        let params = QueryParams {
            courses: vec!["compil".to_string(), "DATABASES".to_string()],
            ..Default::default()
        };
        assert_eq!(ids(&filter(&roster, &params)), vec!["a"]);
    }

    #[test]
    fn test_list_filter_requires_every_term() {
        let roster = sample();
        let params = QueryParams {
            clubs: vec!["chess".to_string(), "robot".to_string()],
            ..Default::default()
        };
        assert_eq!(ids(&filter(&roster, &params)), vec!["a"]);

        let params = QueryParams {
            clubs: vec!["chess".to_string()],
            ..Default::default()
        };
        assert_eq!(ids(&filter(&roster, &params)), vec!["a", "c"]);
    }

    #[test]
    fn test_scalar_filters_use_exact_equality() {
        let roster = sample();
        let mut params = QueryParams::default();
        params.majors.insert("finance".to_string());
        assert!(filter(&roster, &params).is_empty());

        params.majors.clear();
        params.majors.insert("Finance".to_string());
        params.majors.insert("Computer Science".to_string());
        assert_eq!(ids(&filter(&roster, &params)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_class_year_and_dorm() {
        let roster = sample();
        let mut params = QueryParams::default();
        params.class_years.insert(2027);
        assert_eq!(ids(&filter(&roster, &params)), vec!["b"]);

        params.class_years.clear();
        params.dorms.insert("Keough Hall".to_string());
        assert_eq!(ids(&filter(&roster, &params)), vec!["a", "c"]);
    }

    #[test]
    fn test_minor_filter_requires_a_minor() {
        let roster = sample();
        let mut params = QueryParams::default();
        params.minors.insert("Data Science".to_string());
        assert_eq!(ids(&filter(&roster, &params)), vec!["a"]);
    }

    #[test]
    fn test_company_sport_interest_filters() {
        let roster = sample();
        let params = QueryParams {
            companies: vec!["acme".to_string()],
            ..Default::default()
        };
        assert_eq!(ids(&filter(&roster, &params)), vec!["a"]);

        let params = QueryParams {
            sports: vec!["row".to_string()],
            ..Default::default()
        };
        assert_eq!(ids(&filter(&roster, &params)), vec!["b"]);

        let params = QueryParams {
            interests: vec!["venture".to_string()],
            ..Default::default()
        };
        assert_eq!(ids(&filter(&roster, &params)), vec!["c"]);
    }

    #[test]
    fn test_categories_combine_with_and() {
        let roster = sample();
        let mut params = QueryParams {
            clubs: vec!["chess".to_string()],
            ..Default::default()
        };
        params.minors.insert("Data Science".to_string());
        assert_eq!(ids(&filter(&roster, &params)), vec!["a"]);
    }

    #[test]
    fn test_list_term_against_empty_list_fails() {
        let roster = sample();
        let params = QueryParams {
            sports: vec![String::new()],
            ..Default::default()
        };
        // An empty term matches any entry, but needs at least one entry.
        assert_eq!(ids(&filter(&roster, &params)), vec!["b"]);
    }
}
