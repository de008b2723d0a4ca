//! Fuzz target for JSON roster parsing and the query pipeline.
//!
//! Run with: cargo +nightly fuzz run fuzz_roster_query
//!
//! Parses arbitrary bytes as a JSON roster and, when that succeeds, runs a
//! query whose page and page size come from the input. The engine is total,
//! so any panic is a bug.

#![no_main]

use libfuzzer_sys::fuzz_target;
use studentdir_core::query::{self, QueryParams, SortKey};
use studentdir_core::roster::Roster;

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }
    let (head, body) = data.split_at(3);
    let Ok(text) = std::str::from_utf8(body) else {
        return;
    };
    let Ok(roster) = Roster::from_json(text) else {
        return;
    };

    let params = QueryParams {
        sort: SortKey::ALL[head[0] as usize % SortKey::ALL.len()],
        page: head[1] as usize,
        page_size: head[2] as usize,
        ..Default::default()
    };
    let outcome = query::run(roster.students(), &params, 1);
    assert!(outcome.items.len() <= params.page_size);
    assert!(outcome.total_matches <= roster.len());
});
