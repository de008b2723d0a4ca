//! Create/edit form state for a student profile.
//!
//! [`ProfileDraft`] holds free-text fields exactly as typed. Converting a
//! draft into a [`StudentRecord`] validates it and drops unfilled rows.

use tracing::debug;

use crate::editable::{Blank, EditableList};
use crate::model::{Internship, SemesterCourses, SocialLinks, StudentRecord};

/// Validation failures when building a record from a draft.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("class year {0:?} is not a four-digit year")]
    InvalidClassYear(String),

    #[error("email {0:?} is missing an @")]
    InvalidEmail(String),
}

/// One course row: name, section CRN and instructor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseEntry {
    pub name: String,
    pub crn: String,
    pub professor: String,
}

impl Blank for CourseEntry {
    fn is_blank(&self) -> bool {
        self.name.is_blank() && self.crn.is_blank() && self.professor.is_blank()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InternshipEntry {
    pub company: String,
    pub role: String,
}

impl Blank for InternshipEntry {
    fn is_blank(&self) -> bool {
        self.company.is_blank() && self.role.is_blank()
    }
}

/// Social link inputs; blank means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialDraft {
    pub linkedin: String,
    pub twitter: String,
    pub instagram: String,
    pub snapchat: String,
    pub facebook: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDraft {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub class_year: String,
    pub hometown: String,
    pub dorm: String,
    pub profile_photo_url: String,
    pub majors: EditableList<String>,
    pub minors: EditableList<String>,
    pub courses: EditableList<CourseEntry>,
    pub internships: EditableList<InternshipEntry>,
    pub clubs: EditableList<String>,
    pub sports: EditableList<String>,
    pub hobbies: EditableList<String>,
    pub career_interests: EditableList<String>,
    pub social: SocialDraft,
}

impl Default for ProfileDraft {
    /// An empty form with one blank row in every list.
    fn default() -> Self {
        Self {
            id: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            class_year: String::new(),
            hometown: String::new(),
            dorm: String::new(),
            profile_photo_url: String::new(),
            majors: EditableList::with_blank_row(Vec::new()),
            minors: EditableList::with_blank_row(Vec::new()),
            courses: EditableList::with_blank_row(Vec::new()),
            internships: EditableList::with_blank_row(Vec::new()),
            clubs: EditableList::with_blank_row(Vec::new()),
            sports: EditableList::with_blank_row(Vec::new()),
            hobbies: EditableList::with_blank_row(Vec::new()),
            career_interests: EditableList::with_blank_row(Vec::new()),
            social: SocialDraft::default(),
        }
    }
}

impl ProfileDraft {
    /// Pre-fill the edit form from an existing record.
    ///
    /// The name splits at the first space. Comma-joined majors and minors
    /// become separate rows, and the course rows come from the most recent
    /// semester.
    pub fn from_record(record: &StudentRecord) -> Self {
        let name = record.name.trim();
        let (first_name, last_name) = match name.split_once(' ') {
            Some((first, last)) => (first.to_string(), last.trim().to_string()),
            None => (name.to_string(), String::new()),
        };

        let courses: Vec<CourseEntry> = record
            .current_classes()
            .map(|semester| {
                semester
                    .classes
                    .iter()
                    .map(|name| CourseEntry {
                        name: name.clone(),
                        ..Default::default()
                    })
                    .collect()
            })
            .unwrap_or_default();

        let internships: Vec<InternshipEntry> = record
            .internships
            .iter()
            .map(|i| InternshipEntry {
                company: i.company.clone(),
                role: i.role.clone(),
            })
            .collect();

        let social = record.social.clone().unwrap_or_default();

        Self {
            id: record.id.clone(),
            first_name,
            last_name,
            email: record.email.clone(),
            class_year: record.class_year.to_string(),
            hometown: record.hometown.clone(),
            dorm: record.dorm.clone(),
            profile_photo_url: record.profile_photo_url.clone().unwrap_or_default(),
            majors: EditableList::with_blank_row(split_joined(&record.major)),
            minors: EditableList::with_blank_row(
                record.minor.as_deref().map(split_joined).unwrap_or_default(),
            ),
            courses: EditableList::with_blank_row(courses),
            internships: EditableList::with_blank_row(internships),
            clubs: EditableList::with_blank_row(record.clubs.clone()),
            sports: EditableList::with_blank_row(record.sports.clone()),
            hobbies: EditableList::with_blank_row(record.hobbies.clone()),
            career_interests: EditableList::with_blank_row(record.career_interests.clone()),
            social: SocialDraft {
                linkedin: social.linkedin.unwrap_or_default(),
                twitter: social.twitter.unwrap_or_default(),
                instagram: social.instagram.unwrap_or_default(),
                snapchat: social.snapchat.unwrap_or_default(),
                facebook: social.facebook.unwrap_or_default(),
            },
        }
    }

    /// Validate the draft and build a record, filing the course rows under
    /// `semester` (e.g. `FA25`).
    pub fn into_record(self, semester: &str) -> Result<StudentRecord, ProfileError> {
        let id = self.id.trim().to_string();
        if id.is_empty() {
            return Err(ProfileError::MissingField("id"));
        }
        let first_name = self.first_name.trim();
        if first_name.is_empty() {
            return Err(ProfileError::MissingField("first name"));
        }

        let year = self.class_year.trim();
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProfileError::InvalidClassYear(self.class_year));
        }
        let class_year: u16 = year
            .parse()
            .map_err(|_| ProfileError::InvalidClassYear(self.class_year.clone()))?;

        let email = self.email.trim().to_string();
        if !email.is_empty() && !email.contains('@') {
            return Err(ProfileError::InvalidEmail(email));
        }

        let name = match self.last_name.trim() {
            "" => first_name.to_string(),
            last => format!("{first_name} {last}"),
        };

        let minors = trimmed(self.minors.compact());
        let classes: Vec<String> = self
            .courses
            .compact()
            .into_iter()
            .map(|c| c.name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        let courses = if classes.is_empty() {
            Vec::new()
        } else {
            vec![SemesterCourses {
                semester: semester.trim().to_string(),
                classes,
            }]
        };

        let social = SocialLinks {
            linkedin: non_blank(self.social.linkedin),
            twitter: non_blank(self.social.twitter),
            instagram: non_blank(self.social.instagram),
            snapchat: non_blank(self.social.snapchat),
            facebook: non_blank(self.social.facebook),
        };

        let record = StudentRecord {
            id,
            name,
            email,
            class_year,
            major: trimmed(self.majors.compact()).join(", "),
            minor: (!minors.is_empty()).then(|| minors.join(", ")),
            courses,
            hometown: self.hometown.trim().to_string(),
            dorm: self.dorm.trim().to_string(),
            clubs: trimmed(self.clubs.compact()),
            sports: trimmed(self.sports.compact()),
            hobbies: trimmed(self.hobbies.compact()),
            career_interests: trimmed(self.career_interests.compact()),
            internships: self
                .internships
                .compact()
                .into_iter()
                .map(|i| Internship {
                    company: i.company.trim().to_string(),
                    role: i.role.trim().to_string(),
                })
                .collect(),
            profile_photo_url: non_blank(self.profile_photo_url),
            social: (!social.is_empty()).then_some(social),
        };
        debug!(id = %record.id, "profile draft accepted");
        Ok(record)
    }
}

fn split_joined(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn trimmed(rows: Vec<String>) -> Vec<String> {
    rows.into_iter().map(|s| s.trim().to_string()).collect()
}

fn non_blank(value: String) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
