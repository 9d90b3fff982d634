//! External oracle (scheduling/seating/artifact) invocation configuration.

use serde::{Deserialize, Serialize};

/// Default interpreter used to run oracle scripts.
fn default_python_path() -> String {
    "python".to_string()
}

/// Default per-call timeout, in seconds.
const fn default_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OracleConfig {
    /// Interpreter executable for oracle scripts.
    #[serde(default = "default_python_path")]
    pub python_path: String,

    /// Path to the scheduling oracle script (`generate_timetable` op).
    #[serde(default)]
    pub scheduler_script: String,

    /// Path to the seating oracle script (`allocate_seats` op).
    #[serde(default)]
    pub seating_script: String,

    /// Path to the hall ticket generator script (`generate_single` /
    /// `generate_bulk` ops).
    #[serde(default)]
    pub hall_ticket_script: String,

    /// Hard timeout for each oracle subprocess call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            python_path: default_python_path(),
            scheduler_script: String::new(),
            seating_script: String::new(),
            hall_ticket_script: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl OracleConfig {
    /// Check whether the scheduling oracle can be invoked.
    #[must_use]
    pub fn has_scheduler(&self) -> bool {
        !self.scheduler_script.is_empty()
    }

    /// Check whether the seating oracle can be invoked.
    #[must_use]
    pub fn has_seating(&self) -> bool {
        !self.seating_script.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = OracleConfig::default();
        assert_eq!(config.python_path, "python");
        assert_eq!(config.timeout_secs, 120);
        assert!(!config.has_scheduler());
        assert!(!config.has_seating());
    }
}
