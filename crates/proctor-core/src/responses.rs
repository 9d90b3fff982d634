//! Engine/CLI response types returned as JSON by `pct` commands.
//!
//! These structs define the shape of JSON output for commands like
//! `pct schedule create`, `pct ticket issue-bulk`, and `pct schedule delete`,
//! and are the units the orchestration pipeline reports progress in.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::TimetableEntry;
use crate::enums::AllocationMethod;

/// A stage of the schedule orchestration pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    CreateSchedule,
    Timetable,
    Seating,
    Artifacts,
}

impl PipelineStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateSchedule => "create_schedule",
            Self::Timetable => "timetable",
            Self::Seating => "seating",
            Self::Artifacts => "artifacts",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Ok,
    /// Stage completed through the degraded path (e.g., seating fallback,
    /// artifact generation skipped after an error).
    Degraded,
    Failed,
    Skipped,
}

/// One stage's result within a pipeline report.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StageOutcome {
    pub stage: PipelineStage,
    pub status: StageStatus,
    pub message: Option<String>,
}

/// Response from `pct schedule create` — the full pipeline run.
///
/// Callers display partial progress from `stages` rather than a single opaque
/// failure: a failed stage leaves earlier outputs intact and later stages
/// marked `skipped`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PipelineReport {
    pub schedule_id: String,
    pub stages: Vec<StageOutcome>,
    pub timetable: Vec<TimetableEntry>,
    /// Oracle-reported scheduling violations, preserved verbatim.
    pub violations: Vec<String>,
    pub total_allocations: u32,
    pub allocation_method: Option<AllocationMethod>,
}

impl PipelineReport {
    /// The first failed stage, if any.
    #[must_use]
    pub fn failed_stage(&self) -> Option<&StageOutcome> {
        self.stages.iter().find(|s| s.status == StageStatus::Failed)
    }
}

/// One successfully issued hall ticket within a bulk run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IssuedTicket {
    pub register_number: String,
    pub pdf_path: String,
}

/// One per-student failure within a bulk run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TicketFailure {
    pub register_number: String,
    pub reason: String,
}

/// Response from `pct ticket issue-bulk`.
///
/// Issuance is independent per student: one failure never aborts the batch,
/// and every attempted student appears in either `generated` or `errors`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BulkTicketReport {
    pub total: u32,
    pub successful: u32,
    pub failed: u32,
    pub generated: Vec<IssuedTicket>,
    pub errors: Vec<TicketFailure>,
}

/// Response from `pct ticket issue` (single student).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IssueTicketResponse {
    pub register_number: String,
    pub pdf_path: String,
}

/// Response from `pct schedule delete` — everything the cascade removed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ScheduleDeleteReport {
    pub schedule_id: String,
    pub timetable_entries: u32,
    pub seating_allocations: u32,
    pub hall_tickets: u32,
    pub attendance_records: u32,
    pub files_removed: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_stage_finds_first_failure() {
        let report = PipelineReport {
            schedule_id: "sch-00000001".into(),
            stages: vec![
                StageOutcome {
                    stage: PipelineStage::CreateSchedule,
                    status: StageStatus::Ok,
                    message: None,
                },
                StageOutcome {
                    stage: PipelineStage::Timetable,
                    status: StageStatus::Failed,
                    message: Some("oracle exited 1".into()),
                },
                StageOutcome {
                    stage: PipelineStage::Seating,
                    status: StageStatus::Skipped,
                    message: None,
                },
            ],
            timetable: vec![],
            violations: vec![],
            total_allocations: 0,
            allocation_method: None,
        };
        let failed = report.failed_stage().unwrap();
        assert_eq!(failed.stage, PipelineStage::Timetable);
    }

    #[test]
    fn bulk_report_serializes_with_per_item_errors() {
        let report = BulkTicketReport {
            total: 75,
            successful: 73,
            failed: 2,
            generated: vec![],
            errors: vec![TicketFailure {
                register_number: "21CS042".into(),
                reason: "no seating allocation".into(),
            }],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["failed"], 2);
        assert_eq!(json["errors"][0]["register_number"], "21CS042");
    }
}
