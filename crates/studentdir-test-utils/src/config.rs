//! Configuration builders for tests.
//!
//! Use [`TestConfigBuilder`] to create customised [`AppConfig`] values without
//! repeating boilerplate across crate boundaries.

use studentdir_config::AppConfig;

/// Fluent builder for [`AppConfig`] in tests.
///
/// # Example
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .page_sizes(10, &[10, 20])
///     .sibling_count(2)
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: AppConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn roster_path(mut self, path: &str) -> Self {
        self.config.roster.path = path.to_string();
        self
    }

    /// Set the default page size and the offered options together so the
    /// result still validates.
    pub fn page_sizes(mut self, default: usize, options: &[usize]) -> Self {
        self.config.directory.default_page_size = default;
        self.config.directory.page_size_options = options.to_vec();
        self
    }

    pub fn max_page_size(mut self, max: usize) -> Self {
        self.config.directory.max_page_size = max;
        self
    }

    pub fn sibling_count(mut self, n: usize) -> Self {
        self.config.directory.sibling_count = n;
        self
    }

    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.chat.poll_interval_ms = ms;
        self
    }

    pub fn log_level(mut self, level: &str) -> Self {
        self.config.logging.level = level.to_string();
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
