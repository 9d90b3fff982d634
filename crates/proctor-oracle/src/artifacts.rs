//! Artifact oracle adapter: timetable/seating PDFs and hall ticket PDFs.
//!
//! PDF layout is not an in-process concern; every document is produced by a
//! script behind the same subprocess transport as the other oracles.
//! Artifact failures are non-fatal in the scheduling pipeline, so callers
//! typically log these errors instead of propagating them.

use serde::{Deserialize, Serialize};

use proctor_config::OracleConfig;

use crate::error::OracleError;
use crate::transport::call_oracle;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SchedulePdfParams<'a> {
    schedule_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SingleTicketParams<'a> {
    schedule_id: &'a str,
    register_number: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct BulkTicketParams<'a> {
    schedule_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PdfPathResponse {
    success: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    pdf_path: Option<String>,
}

/// Student and faculty seating charts for one schedule.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatingPdfs {
    pub student_pdf_path: String,
    pub faculty_pdf_path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeatingPdfResponse {
    success: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    student_pdf_path: Option<String>,
    #[serde(default)]
    faculty_pdf_path: Option<String>,
}

/// Result of a bulk ticket PDF run: paths produced plus per-student errors.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkTicketPdfs {
    #[serde(default)]
    pub generated: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulkTicketResponse {
    success: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    generated: Vec<String>,
    #[serde(default)]
    errors: Vec<String>,
}

/// Capability seam for document generation.
pub trait ArtifactOracle {
    /// Render the timetable PDF for a schedule, returning its path.
    fn timetable_pdf(
        &self,
        schedule_id: &str,
    ) -> impl Future<Output = Result<String, OracleError>> + Send;

    /// Render the student and faculty seating charts for a schedule.
    fn seating_pdfs(
        &self,
        schedule_id: &str,
    ) -> impl Future<Output = Result<SeatingPdfs, OracleError>> + Send;

    /// Render one student's hall ticket PDF, returning its path.
    fn ticket_pdf(
        &self,
        schedule_id: &str,
        register_number: &str,
    ) -> impl Future<Output = Result<String, OracleError>> + Send;

    /// Render hall ticket PDFs for a whole cohort.
    fn ticket_pdfs_bulk(
        &self,
        schedule_id: &str,
        year: Option<i64>,
    ) -> impl Future<Output = Result<BulkTicketPdfs, OracleError>> + Send;
}

/// Subprocess-backed `ArtifactOracle`. Timetable and seating charts go
/// through the scripts that computed them; ticket PDFs through the hall
/// ticket script.
#[derive(Debug, Clone)]
pub struct ProcessArtifactOracle {
    config: OracleConfig,
}

impl ProcessArtifactOracle {
    #[must_use]
    pub const fn new(config: OracleConfig) -> Self {
        Self { config }
    }
}

impl ArtifactOracle for ProcessArtifactOracle {
    async fn timetable_pdf(&self, schedule_id: &str) -> Result<String, OracleError> {
        let response: PdfPathResponse = call_oracle(
            &self.config,
            &self.config.scheduler_script,
            "generate_timetable_pdf",
            &SchedulePdfParams { schedule_id },
        )
        .await?;
        if !response.success {
            return Err(OracleError::Rejected(response.message));
        }
        response.pdf_path.ok_or_else(|| {
            OracleError::MalformedOutput("generate_timetable_pdf returned no pdfPath".to_string())
        })
    }

    async fn seating_pdfs(&self, schedule_id: &str) -> Result<SeatingPdfs, OracleError> {
        let response: SeatingPdfResponse = call_oracle(
            &self.config,
            &self.config.seating_script,
            "generate_seating_pdfs",
            &SchedulePdfParams { schedule_id },
        )
        .await?;
        if !response.success {
            return Err(OracleError::Rejected(response.message));
        }
        match (response.student_pdf_path, response.faculty_pdf_path) {
            (Some(student_pdf_path), Some(faculty_pdf_path)) => Ok(SeatingPdfs {
                student_pdf_path,
                faculty_pdf_path,
            }),
            _ => Err(OracleError::MalformedOutput(
                "generate_seating_pdfs returned incomplete paths".to_string(),
            )),
        }
    }

    async fn ticket_pdf(
        &self,
        schedule_id: &str,
        register_number: &str,
    ) -> Result<String, OracleError> {
        let response: PdfPathResponse = call_oracle(
            &self.config,
            &self.config.hall_ticket_script,
            "generate_single",
            &SingleTicketParams {
                schedule_id,
                register_number,
            },
        )
        .await?;
        if !response.success {
            return Err(OracleError::Rejected(response.message));
        }
        response.pdf_path.ok_or_else(|| {
            OracleError::MalformedOutput("generate_single returned no pdfPath".to_string())
        })
    }

    async fn ticket_pdfs_bulk(
        &self,
        schedule_id: &str,
        year: Option<i64>,
    ) -> Result<BulkTicketPdfs, OracleError> {
        let response: BulkTicketResponse = call_oracle(
            &self.config,
            &self.config.hall_ticket_script,
            "generate_bulk",
            &BulkTicketParams { schedule_id, year },
        )
        .await?;
        if !response.success {
            return Err(OracleError::Rejected(response.message));
        }
        Ok(BulkTicketPdfs {
            generated: response.generated,
            errors: response.errors,
        })
    }
}
