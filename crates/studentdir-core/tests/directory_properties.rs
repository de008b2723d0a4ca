//! End-to-end properties of the directory query pipeline.

use std::collections::BTreeSet;

use pretty_assertions::assert_eq;

use studentdir_core::model::StudentRecord;
use studentdir_core::query::{
    self, PageItem, QueryParams, SortKey, filter, paginate, pagination_window, sort_students,
    total_pages,
};
use studentdir_test_utils::fixtures::{numbered_students, sample_students};
use studentdir_test_utils::StudentBuilder;

fn ids(students: &[&StudentRecord]) -> Vec<String> {
    students.iter().map(|s| s.id.clone()).collect()
}

/// A handful of parameter sets touching every filter category.
fn param_sets() -> Vec<QueryParams> {
    let mut sets = vec![QueryParams::default()];

    let mut p = QueryParams {
        name: "lee".to_string(),
        ..Default::default()
    };
    p.majors.insert("Computer Science".to_string());
    p.majors.insert("Finance".to_string());
    sets.push(p);

    let mut p = QueryParams {
        clubs: vec!["chess".to_string()],
        ..Default::default()
    };
    p.dorms.insert("Walsh Hall".to_string());
    p.dorms.insert("Keough Hall".to_string());
    sets.push(p);

    let mut p = QueryParams {
        interests: vec!["software".to_string()],
        courses: vec!["DATA".to_string()],
        ..Default::default()
    };
    p.class_years.insert(2026);
    p.class_years.insert(2028);
    sets.push(p);

    let mut p = QueryParams {
        companies: vec!["acme".to_string()],
        ..Default::default()
    };
    p.minors.insert("Data Science".to_string());
    p.hometowns.insert("South Bend, IN".to_string());
    sets.push(p);

    sets.push(QueryParams {
        sports: vec!["row".to_string()],
        ..Default::default()
    });
    sets
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn any_contains(entries: &[String], term: &str) -> bool {
    entries.iter().any(|e| contains_ci(e, term))
}

/// Check every active predicate directly against the record.
fn satisfies(s: &StudentRecord, p: &QueryParams) -> bool {
    let classes: Vec<String> = s
        .courses
        .iter()
        .flat_map(|c| c.classes.iter().cloned())
        .collect();
    let companies: Vec<String> = s.internships.iter().map(|i| i.company.clone()).collect();

    (p.name.trim().is_empty() || contains_ci(&s.name, p.name.trim()))
        && (p.class_years.is_empty() || p.class_years.contains(&s.class_year))
        && (p.majors.is_empty() || p.majors.contains(&s.major))
        && (p.minors.is_empty() || s.minor.as_ref().is_some_and(|m| p.minors.contains(m)))
        && (p.dorms.is_empty() || p.dorms.contains(&s.dorm))
        && (p.hometowns.is_empty() || p.hometowns.contains(&s.hometown))
        && p.courses.iter().all(|t| any_contains(&classes, t))
        && p.companies.iter().all(|t| any_contains(&companies, t))
        && p.clubs.iter().all(|t| any_contains(&s.clubs, t))
        && p.sports.iter().all(|t| any_contains(&s.sports, t))
        && p.interests.iter().all(|t| any_contains(&s.career_interests, t))
}

/// Split `p` into one single-category params per active filter.
fn single_category_params(p: &QueryParams) -> Vec<QueryParams> {
    macro_rules! singles {
        ($($field:ident),*) => {{
            let mut out = Vec::new();
            $(
                if !p.$field.is_empty() {
                    let mut single = QueryParams::default();
                    single.$field = p.$field.clone();
                    out.push(single);
                }
            )*
            out
        }};
    }
    singles!(
        name,
        class_years,
        majors,
        minors,
        dorms,
        hometowns,
        courses,
        companies,
        clubs,
        sports,
        interests
    )
}

#[test]
fn filter_returns_only_students_satisfying_every_predicate() {
    let roster = sample_students();
    for params in param_sets() {
        let result = filter(&roster, &params);
        assert!(result.iter().all(|s| satisfies(s, &params)), "{params:?}");

        let expected: Vec<&StudentRecord> =
            roster.iter().filter(|s| satisfies(s, &params)).collect();
        assert_eq!(ids(&result), ids(&expected));
    }
}

#[test]
fn filter_categories_commute() {
    let roster = sample_students();
    for params in param_sets() {
        let combined: BTreeSet<String> = filter(&roster, &params)
            .into_iter()
            .map(|s| s.id.clone())
            .collect();

        let singles = single_category_params(&params);
        let mut forward: BTreeSet<String> = roster.iter().map(|s| s.id.clone()).collect();
        for single in &singles {
            let hit: BTreeSet<String> =
                filter(&roster, single).into_iter().map(|s| s.id.clone()).collect();
            forward = forward.intersection(&hit).cloned().collect();
        }
        let mut backward: BTreeSet<String> = roster.iter().map(|s| s.id.clone()).collect();
        for single in singles.iter().rev() {
            let hit: BTreeSet<String> =
                filter(&roster, single).into_iter().map(|s| s.id.clone()).collect();
            backward = backward.intersection(&hit).cloned().collect();
        }

        assert_eq!(forward, combined);
        assert_eq!(backward, combined);
    }
}

#[test]
fn course_filter_matches_substring_case_insensitively() {
    let roster = vec![
        StudentBuilder::new("a", "Ann Able")
            .semester("FA25", &["Databases"])
            .build(),
        StudentBuilder::new("b", "Ben Baker")
            .semester("FA25", &["Operating Systems"])
            .build(),
        StudentBuilder::new("c", "Cal Cole").build(),
    ];
    let params = QueryParams {
        courses: vec!["data".to_string()],
        ..Default::default()
    };
    assert_eq!(ids(&filter(&roster, &params)), vec!["a"]);
}

#[test]
fn sort_is_stable_for_equal_keys() {
    let roster = vec![
        StudentBuilder::new("1", "Bob Zephyr").build(),
        StudentBuilder::new("2", "Amy Zephyr").build(),
    ];
    let mut refs: Vec<&StudentRecord> = roster.iter().collect();
    sort_students(&mut refs, SortKey::LastAz);
    let names: Vec<&str> = refs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Bob Zephyr", "Amy Zephyr"]);
}

#[test]
fn sort_stability_holds_for_every_key() {
    // Pairs with identical names, distinguished only by id.
    let roster: Vec<StudentRecord> = ["Lee Park", "Ada Park", "Lee Park", "Ada Park"]
        .iter()
        .enumerate()
        .map(|(i, name)| StudentBuilder::new(&i.to_string(), name).build())
        .collect();
    for key in SortKey::ALL {
        let mut refs: Vec<&StudentRecord> = roster.iter().collect();
        sort_students(&mut refs, key);
        for pair in refs.windows(2) {
            let equal_key = match key {
                SortKey::FirstAz | SortKey::FirstZa => pair[0].name == pair[1].name,
                SortKey::LastAz | SortKey::LastZa => pair[0].last_name() == pair[1].last_name(),
            };
            if equal_key {
                assert!(pair[0].id < pair[1].id, "{key}: {:?}", ids(&refs));
            }
        }
    }
}

#[test]
fn single_page_holds_everything_and_pages_reassemble() {
    let roster = numbered_students(53);
    for params in [QueryParams::default(), {
        let mut p = QueryParams {
            sort: SortKey::FirstZa,
            ..Default::default()
        };
        p.class_years.insert(2026);
        p
    }] {
        let mut ordered = filter(&roster, &params);
        sort_students(&mut ordered, params.sort);

        let one_page = paginate(&ordered, 1, roster.len());
        assert_eq!(ids(one_page.items), ids(&ordered));
        assert_eq!(one_page.total_pages, 1);

        for size in [1, 7, 10, 53, 60] {
            let pages = total_pages(ordered.len(), size);
            let rebuilt: Vec<&StudentRecord> = (1..=pages)
                .flat_map(|p| paginate(&ordered, p, size).items.iter().copied())
                .collect();
            assert_eq!(ids(&rebuilt), ids(&ordered), "page size {size}");
        }
    }
}

#[test]
fn window_lists_every_page_within_budget() {
    for sibling_count in 0..4 {
        for total in 0..=sibling_count + 5 {
            for current in 1..=total.max(1) {
                let expected: Vec<PageItem> = (1..=total).map(PageItem::Page).collect();
                assert_eq!(pagination_window(current, total, sibling_count), expected);
            }
        }
    }
}

#[test]
fn window_examples() {
    use PageItem::{Ellipsis as E, Page as P};
    assert_eq!(
        pagination_window(5, 5, 1),
        vec![P(1), P(2), P(3), P(4), P(5)]
    );
    assert_eq!(
        pagination_window(6, 20, 1),
        vec![P(1), E, P(5), P(6), P(7), E, P(20)]
    );
    assert_eq!(
        pagination_window(1, 20, 1),
        vec![P(1), P(2), P(3), P(4), P(5), E, P(20)]
    );
}

#[test]
fn window_is_well_formed_for_all_inputs() {
    for sibling_count in 0..6 {
        for total in 1..40 {
            for current in 1..=total {
                let window = pagination_window(current, total, sibling_count);
                let pages: Vec<usize> = window
                    .iter()
                    .filter_map(|i| match i {
                        PageItem::Page(n) => Some(*n),
                        PageItem::Ellipsis => None,
                    })
                    .collect();
                assert_eq!(pages.first(), Some(&1));
                assert_eq!(pages.last(), Some(&total));
                assert!(pages.windows(2).all(|w| w[0] < w[1]), "{window:?}");
                assert!(pages.contains(&current), "{current}/{total}: {window:?}");
                assert!(
                    window.windows(2).all(|w| w != [PageItem::Ellipsis, PageItem::Ellipsis]),
                    "{window:?}"
                );
            }
        }
    }
}

#[test]
fn run_composes_the_pipeline() {
    let roster = sample_students();
    let mut params = QueryParams {
        sort: SortKey::LastAz,
        page_size: 2,
        ..Default::default()
    };
    params.majors.insert("Computer Science".to_string());
    params.majors.insert("Finance".to_string());
    params.majors.insert("Biology".to_string());

    let outcome = query::run(&roster, &params, 1);
    assert_eq!(outcome.total_matches, 6);
    assert_eq!(outcome.total_pages, 3);
    let names: Vec<&str> = outcome.items.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Eva Kim", "Dan Lee"]);
}
