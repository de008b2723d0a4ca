//! Semester labels (`SP26`, `FA25`) and their chronological order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Academic term within a year. Spring precedes fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    Spring,
    Fall,
}

/// A parsed semester label: two-letter term code plus two-digit year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SemesterCode {
    /// Two-digit year (`25` for 2025).
    pub year: u8,
    pub term: Term,
}

/// Error returned for labels that are not `SPyy` / `FAyy`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid semester label {0:?} (expected e.g. \"FA25\" or \"SP26\")")]
pub struct ParseSemesterError(pub String);

impl FromStr for SemesterCode {
    type Err = ParseSemesterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        let invalid = || ParseSemesterError(s.to_string());
        if label.len() != 4 || !label.is_ascii() {
            return Err(invalid());
        }
        let (code, digits) = label.split_at(2);
        let term = match code.to_ascii_uppercase().as_str() {
            "SP" => Term::Spring,
            "FA" => Term::Fall,
            _ => return Err(invalid()),
        };
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let year = digits.parse().map_err(|_| invalid())?;
        Ok(Self { year, term })
    }
}

impl Ord for SemesterCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then_with(|| self.term.cmp(&other.term))
    }
}

impl PartialOrd for SemesterCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SemesterCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self.term {
            Term::Spring => "SP",
            Term::Fall => "FA",
        };
        write!(f, "{code}{:02}", self.year)
    }
}

/// The latest parseable label among `labels`, trimmed.
///
/// Blank and unparseable labels are skipped; `None` when nothing parses.
/// When two labels denote the same semester the first one wins.
pub fn most_recent_semester<'a, I>(labels: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(SemesterCode, &'a str)> = None;
    for label in labels {
        let label = label.trim();
        let Ok(code) = label.parse::<SemesterCode>() else {
            continue;
        };
        match best {
            Some((current, _)) if current >= code => {}
            _ => best = Some((code, label)),
        }
    }
    best.map(|(_, label)| label)
}
