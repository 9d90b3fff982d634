//! Scheduling oracle adapter (`generate_timetable` op).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use proctor_config::OracleConfig;
use proctor_core::enums::{ExamSession, ExamType};

use crate::error::OracleError;
use crate::transport::call_oracle;

/// Wire request for `generate_timetable`. Field names follow the oracle's
/// JSON contract, not Rust convention.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableRequest {
    pub year: i64,
    pub semester: i64,
    pub exam_type: ExamType,
    pub session: ExamSession,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub holidays: Vec<NaiveDate>,
    pub schedule_id: String,
}

/// One scheduled subject slot as the oracle reports it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableSlot {
    pub subject_code: String,
    #[serde(default)]
    pub subject_name: Option<String>,
    pub date: NaiveDate,
    pub time_start: String,
    pub time_end: String,
    #[serde(default)]
    pub halls: Vec<String>,
    #[serde(default)]
    pub invigilators: Vec<String>,
    /// Clash text the oracle could not resolve. Preserved verbatim — the
    /// engine never suppresses a conflict it knows about.
    #[serde(default)]
    pub violations: Vec<String>,
}

/// Wire response for `generate_timetable`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub timetable: Vec<TimetableSlot>,
    #[serde(default)]
    pub violations: Vec<String>,
}

/// Capability seam for timetable generation. Production uses the subprocess
/// implementation; orchestration tests use scripted fakes.
pub trait TimetableOracle {
    fn generate_timetable(
        &self,
        request: &TimetableRequest,
    ) -> impl Future<Output = Result<TimetableResponse, OracleError>> + Send;
}

/// Subprocess-backed `TimetableOracle`.
#[derive(Debug, Clone)]
pub struct ProcessTimetableOracle {
    config: OracleConfig,
}

impl ProcessTimetableOracle {
    #[must_use]
    pub const fn new(config: OracleConfig) -> Self {
        Self { config }
    }
}

impl TimetableOracle for ProcessTimetableOracle {
    async fn generate_timetable(
        &self,
        request: &TimetableRequest,
    ) -> Result<TimetableResponse, OracleError> {
        let response: TimetableResponse = call_oracle(
            &self.config,
            &self.config.scheduler_script,
            "generate_timetable",
            request,
        )
        .await?;
        if !response.success {
            return Err(OracleError::Rejected(response.message));
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_serializes_to_oracle_contract() {
        let request = TimetableRequest {
            year: 3,
            semester: 5,
            exam_type: ExamType::Internal1,
            session: ExamSession::Morning,
            start_date: "2025-03-10".parse().unwrap(),
            end_date: "2025-03-20".parse().unwrap(),
            holidays: vec!["2025-03-15".parse().unwrap()],
            schedule_id: "sch-deadbeef".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["examType"], "Internal1");
        assert_eq!(value["startDate"], "2025-03-10");
        assert_eq!(value["holidays"][0], "2025-03-15");
        assert_eq!(value["scheduleId"], "sch-deadbeef");
    }

    #[test]
    fn response_parses_with_missing_optionals() {
        let raw = r#"{
            "success": true,
            "message": "ok",
            "timetable": [
                {"subjectCode": "CS301", "date": "2025-03-10",
                 "timeStart": "09:30", "timeEnd": "12:30"}
            ]
        }"#;
        let response: TimetableResponse = serde_json::from_str(raw).unwrap();
        assert!(response.success);
        assert_eq!(response.timetable.len(), 1);
        assert_eq!(response.timetable[0].subject_name, None);
        assert!(response.timetable[0].violations.is_empty());
    }
}
