//! Temporary roster and config files.

use std::path::{Path, PathBuf};

use studentdir_core::model::StudentRecord;
use tempfile::TempDir;

/// Files written into a test-scoped temp directory.
///
/// The directory is deleted when this value is dropped, including on panic.
pub struct TestRosterFile {
    pub path: PathBuf,
    temp_dir: TempDir,
}

impl TestRosterFile {
    /// Write `students` as a JSON roster.
    pub async fn json(students: &[StudentRecord]) -> Self {
        let body = serde_json::to_string_pretty(students).expect("failed to encode roster");
        Self::with_contents("students.json", &body).await
    }

    /// Write `contents` verbatim to `file_name`.
    pub async fn with_contents(file_name: &str, contents: &str) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join(file_name);
        tokio::fs::write(&path, contents)
            .await
            .expect("failed to write test roster");
        Self { path, temp_dir }
    }

    /// Write a config file next to the roster pointing at it.
    pub async fn write_config(&self, extra_toml: &str) -> PathBuf {
        let config_path = self.dir().join("studentdir.toml");
        let body = format!(
            "[roster]\npath = {:?}\n\n{extra_toml}",
            self.path.display().to_string()
        );
        tokio::fs::write(&config_path, body)
            .await
            .expect("failed to write test config");
        config_path
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }
}
