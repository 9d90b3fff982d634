//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default QR scan window around exam start, in minutes.
const fn default_scan_window_minutes() -> i64 {
    30
}

/// Default result limit for list commands.
const fn default_limit() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Minutes before/after exam start during which QR scanning is accepted.
    #[serde(default = "default_scan_window_minutes")]
    pub scan_window_minutes: i64,

    /// Default result limit for list commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            scan_window_minutes: default_scan_window_minutes(),
            default_limit: default_limit(),
        }
    }
}
