//! The roster: the full, read-only collection of student records.
//!
//! A [`Roster`] is built once (from memory or from a `.json` / `.toml` file)
//! and never mutated afterwards. Construction enforces id uniqueness.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::model::StudentRecord;

/// Errors from building or loading a roster.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to read roster file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse JSON roster: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse TOML roster: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("duplicate student id {0:?}")]
    DuplicateId(String),

    #[error("unsupported roster format {0:?} (expected .json or .toml)")]
    UnsupportedFormat(String),
}

/// TOML rosters wrap the records in a top-level `[[students]]` array.
#[derive(Deserialize)]
struct TomlRoster {
    #[serde(default)]
    students: Vec<StudentRecord>,
}

/// An immutable, id-unique list of students in load order.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    students: Vec<StudentRecord>,
}

impl Roster {
    /// Build a roster, rejecting duplicate ids.
    pub fn new(students: Vec<StudentRecord>) -> Result<Self, RosterError> {
        let mut seen = HashSet::with_capacity(students.len());
        for student in &students {
            if !seen.insert(student.id.as_str()) {
                return Err(RosterError::DuplicateId(student.id.clone()));
            }
        }
        Ok(Self { students })
    }

    /// Parse a JSON array of student records.
    pub fn from_json(s: &str) -> Result<Self, RosterError> {
        let students: Vec<StudentRecord> = serde_json::from_str(s)?;
        Self::new(students)
    }

    /// Parse a TOML document with a `[[students]]` array.
    pub fn from_toml(s: &str) -> Result<Self, RosterError> {
        let doc: TomlRoster = toml::from_str(s)?;
        Self::new(doc.students)
    }

    /// Load a roster file, choosing the parser from the file extension.
    pub async fn load(path: &Path) -> Result<Self, RosterError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if ext != "json" && ext != "toml" {
            return Err(RosterError::UnsupportedFormat(path.display().to_string()));
        }

        let content = tokio::fs::read_to_string(path).await?;
        let roster = if ext == "json" {
            Self::from_json(&content)?
        } else {
            Self::from_toml(&content)?
        };

        info!(path = %path.display(), students = roster.len(), "roster loaded");
        Ok(roster)
    }

    /// All students in load order.
    pub fn students(&self) -> &[StudentRecord] {
        &self.students
    }

    /// Look up a student by id.
    pub fn get(&self, id: &str) -> Option<&StudentRecord> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}
