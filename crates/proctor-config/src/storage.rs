//! Database and artifact storage configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_db_path() -> String {
    ".proctor/proctor.db".to_string()
}

fn default_uploads_dir() -> String {
    "uploads".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Path to the libSQL database file, or `":memory:"` for tests.
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Root directory for generated artifacts. Stage subdirectories
    /// (`timetables/`, `seating/`, `hall-tickets/`) live under it.
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            uploads_dir: default_uploads_dir(),
        }
    }
}

impl StorageConfig {
    /// Directory for generated timetable PDFs.
    #[must_use]
    pub fn timetables_dir(&self) -> PathBuf {
        Path::new(&self.uploads_dir).join("timetables")
    }

    /// Directory for generated seating PDFs (student and faculty variants).
    #[must_use]
    pub fn seating_dir(&self) -> PathBuf {
        Path::new(&self.uploads_dir).join("seating")
    }

    /// Directory for generated hall ticket PDFs.
    #[must_use]
    pub fn hall_tickets_dir(&self) -> PathBuf {
        Path::new(&self.uploads_dir).join("hall-tickets")
    }
}
