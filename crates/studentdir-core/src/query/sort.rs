//! Stable name ordering.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::model::{StudentRecord, last_name_of};

use super::SortKey;

/// Compare two names the way a directory listing reads them.
///
/// Three levels, each consulted only when the previous one ties:
/// base letters with accents stripped and case folded (`Éamon` sorts with
/// `Eamon`), then accents (unaccented first), then case (lowercase first).
pub fn collate(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accented(a).cmp(accented(b)))
        .then_with(|| case_order(a, b))
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn accented(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

fn case_order(a: &str, b: &str) -> Ordering {
    for (ca, cb) in a.nfd().zip(b.nfd()) {
        if ca == cb {
            continue;
        }
        return match (ca.is_lowercase(), cb.is_lowercase()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => ca.cmp(&cb),
        };
    }
    a.nfd().count().cmp(&b.nfd().count())
}

/// Sort in place by `key`.
///
/// The sort is stable in both directions: students whose keys collate equal
/// keep their relative input order.
pub fn sort_students(students: &mut [&StudentRecord], key: SortKey) {
    match key {
        SortKey::FirstAz => students.sort_by(|a, b| collate(&a.name, &b.name)),
        SortKey::FirstZa => students.sort_by(|a, b| collate(&b.name, &a.name)),
        SortKey::LastAz => {
            students.sort_by(|a, b| collate(last_name_of(&a.name), last_name_of(&b.name)))
        }
        SortKey::LastZa => {
            students.sort_by(|a, b| collate(last_name_of(&b.name), last_name_of(&a.name)))
        }
    }
}
