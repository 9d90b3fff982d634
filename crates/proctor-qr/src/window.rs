//! Attendance scan window around an exam's start time.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Scanning opens and closes this many minutes either side of exam start.
pub const DEFAULT_SCAN_WINDOW_MINUTES: i64 = 30;

/// Where `now` sits relative to the scan window. Both boundaries are
/// inclusive: a scan at exactly start−window or start+window is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScanWindow {
    NotYetOpen { opens_in_minutes: i64 },
    Open { remaining_minutes: i64 },
    Closed,
}

impl ScanWindow {
    /// Human-readable status for scanner operators.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::NotYetOpen { opens_in_minutes } => {
                format!("Scanning opens in {opens_in_minutes} minute(s)")
            }
            Self::Open { remaining_minutes } => {
                format!("Scanning open, {remaining_minutes} minute(s) remaining")
            }
            Self::Closed => "Scanning window has closed".to_string(),
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

/// Whether a scan at `now` falls inside the window around `exam_start`.
#[must_use]
pub fn is_scan_allowed(
    exam_start: DateTime<Utc>,
    now: DateTime<Utc>,
    window_minutes: i64,
) -> bool {
    let window = Duration::minutes(window_minutes);
    now >= exam_start - window && now <= exam_start + window
}

/// Classify `now` against the window, with minute counts for the operator
/// message. Partial minutes round up so "opens in 0 minutes" never shows
/// while the window is still shut.
#[must_use]
pub fn scan_window_status(
    exam_start: DateTime<Utc>,
    now: DateTime<Utc>,
    window_minutes: i64,
) -> ScanWindow {
    let window = Duration::minutes(window_minutes);
    let opens_at = exam_start - window;
    let closes_at = exam_start + window;

    if now < opens_at {
        ScanWindow::NotYetOpen {
            opens_in_minutes: ceil_minutes(opens_at - now),
        }
    } else if now <= closes_at {
        ScanWindow::Open {
            remaining_minutes: ceil_minutes(closes_at - now),
        }
    } else {
        ScanWindow::Closed
    }
}

fn ceil_minutes(duration: Duration) -> i64 {
    let secs = duration.num_seconds().max(0);
    secs / 60 + i64::from(secs % 60 != 0)
}
