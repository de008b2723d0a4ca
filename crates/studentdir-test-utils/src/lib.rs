#![deny(unsafe_code)]

//! Shared test utilities for the student directory workspace.
//!
//! Provides student fixtures, config builders, temporary roster files and
//! tracing helpers so that individual crate tests stay concise.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! studentdir-test-utils = { workspace = true }
//! ```

pub mod config;
pub mod fixtures;
pub mod roster_file;
pub mod tracing_setup;

pub use config::TestConfigBuilder;
pub use fixtures::{StudentBuilder, sample_roster};
pub use roster_file::TestRosterFile;
