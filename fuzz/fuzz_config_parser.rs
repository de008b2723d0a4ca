//! Fuzz target for the TOML configuration parser.
//!
//! Run with: cargo +nightly fuzz run fuzz_config_parser
//!
//! Feeds arbitrary text to `AppConfig::parse()`. Any config that parses must
//! also pass `validate()` again, since `parse` validates before returning.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = studentdir_config::AppConfig::parse(s) {
        assert!(config.validate().is_ok());
        assert!(
            config
                .directory
                .page_size_options
                .contains(&config.directory.default_page_size)
        );
    }
});
