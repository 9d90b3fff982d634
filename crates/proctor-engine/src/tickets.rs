//! Hall ticket authorization and issuance.
//!
//! Tickets exist only for SEM schedules and only after an explicit COE
//! authorization. Bulk issuance treats each student independently: one
//! failure never aborts the batch, and every attempted student ends up in
//! either `generated` or `errors`.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use proctor_core::entities::{HallTicket, Schedule};
use proctor_core::enums::ExamType;
use proctor_core::responses::{BulkTicketReport, IssueTicketResponse, IssuedTicket, TicketFailure};
use proctor_db::repos::ticket::NewTicket;
use proctor_oracle::{ArtifactOracle, SeatingOracle, TimetableOracle};
use proctor_qr::TicketPayload;

use crate::Engine;
use crate::error::EngineError;

impl<T, S, A> Engine<T, S, A>
where
    T: TimetableOracle,
    S: SeatingOracle,
    A: ArtifactOracle,
{
    /// Authorize hall ticket issuance for a SEM schedule, then issue the
    /// cohort's tickets. Issuance failures do not undo the authorization.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Validation` for non-SEM or already-authorized
    /// schedules and `EngineError::NotFound` for unknown ones.
    pub async fn authorize_hall_tickets(
        &self,
        schedule_id: &str,
        actor: &str,
    ) -> Result<BulkTicketReport, EngineError> {
        let schedule = self
            .store()
            .authorize_hall_tickets(schedule_id, actor)
            .await?;
        info!(schedule_id, actor, "hall tickets authorized, issuing cohort");
        self.issue_bulk_for(&schedule, None).await
    }

    /// Issue (or re-issue) one student's hall ticket.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown schedule/student/seat, `NotAuthorized` when
    /// the schedule is not an authorized SEM schedule, `Validation` when the
    /// existing ticket has been downloaded and not reset.
    pub async fn issue_ticket(
        &self,
        schedule_id: &str,
        register_number: &str,
        actor: &str,
    ) -> Result<IssueTicketResponse, EngineError> {
        let schedule = self.store().get_schedule(schedule_id).await?;
        self.check_issuable(&schedule)?;

        let ticket = self
            .issue_one(&schedule, register_number, actor)
            .await
            .map_err(|failure| failure.error)?;
        Ok(IssueTicketResponse {
            register_number: register_number.to_string(),
            pdf_path: ticket.pdf_path.unwrap_or_default(),
        })
    }

    /// Issue tickets for every eligible student of a schedule, optionally
    /// restricted to one year of study.
    ///
    /// # Errors
    ///
    /// Fails only on schedule-level problems (unknown or unauthorized
    /// schedule); per-student failures are reported inline.
    pub async fn issue_bulk(
        &self,
        schedule_id: &str,
        year: Option<i64>,
    ) -> Result<BulkTicketReport, EngineError> {
        let schedule = self.store().get_schedule(schedule_id).await?;
        self.check_issuable(&schedule)?;
        self.issue_bulk_for(&schedule, year).await
    }

    /// Resolve a ticket's PDF for handing out and record the download.
    /// Resolution is confined to the hall-tickets directory; re-downloading
    /// keeps the first download timestamp.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown ticket, `Validation` when it has no PDF or
    /// its stored name would escape the hall-tickets directory.
    pub async fn download_ticket(
        &self,
        ticket_id: &str,
    ) -> Result<TicketDownload, EngineError> {
        let ticket = self.store().get_ticket(ticket_id).await?;
        let Some(pdf_path) = ticket.pdf_path.as_deref() else {
            return Err(EngineError::Validation(format!(
                "ticket {ticket_id} has no generated PDF"
            )));
        };
        let file_name = Path::new(pdf_path)
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                EngineError::Validation(format!("ticket {ticket_id} has an unusable PDF path"))
            })?;
        let path = self.hall_ticket_download_path(file_name)?;

        let ticket = self.store().mark_ticket_downloaded(ticket_id).await?;
        Ok(TicketDownload { path, ticket })
    }

    /// Clear a ticket's downloaded flag so it can be re-issued.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotFound` for an unknown ticket.
    pub async fn reset_ticket_download(
        &self,
        ticket_id: &str,
        actor: &str,
    ) -> Result<HallTicket, EngineError> {
        Ok(self.store().reset_ticket_download(ticket_id, actor).await?)
    }

    fn check_issuable(&self, schedule: &Schedule) -> Result<(), EngineError> {
        if schedule.exam_type != ExamType::Sem {
            return Err(EngineError::NotAuthorized(format!(
                "hall tickets are only issued for SEM exams (schedule {} is {})",
                schedule.id, schedule.exam_type
            )));
        }
        if !schedule.hall_tickets_authorized {
            return Err(EngineError::NotAuthorized(format!(
                "hall tickets for schedule {} have not been authorized",
                schedule.id
            )));
        }
        if !self.config().signing.is_configured() {
            return Err(EngineError::Validation(
                "no QR signing secret is configured".to_string(),
            ));
        }
        Ok(())
    }

    async fn issue_bulk_for(
        &self,
        schedule: &Schedule,
        year: Option<i64>,
    ) -> Result<BulkTicketReport, EngineError> {
        if !self.config().signing.is_configured() {
            return Err(EngineError::Validation(
                "no QR signing secret is configured".to_string(),
            ));
        }
        let students = self
            .store()
            .list_students_by_year(year.unwrap_or(schedule.year))
            .await?;

        let mut report = BulkTicketReport {
            total: u32::try_from(students.len()).unwrap_or(u32::MAX),
            successful: 0,
            failed: 0,
            generated: vec![],
            errors: vec![],
        };

        for student in &students {
            let Some(register_number) = student.register_number.as_deref() else {
                report.failed += 1;
                // No register number to key on, so the person ID identifies
                // the failure instead.
                report.errors.push(TicketFailure {
                    register_number: student.id.clone(),
                    reason: format!("student {} has no register number", student.id),
                });
                continue;
            };
            let authorized_by = schedule.authorized_by.as_deref().unwrap_or("");
            match self.issue_one(schedule, register_number, authorized_by).await {
                Ok(ticket) => {
                    report.successful += 1;
                    report.generated.push(IssuedTicket {
                        register_number: register_number.to_string(),
                        pdf_path: ticket.pdf_path.unwrap_or_default(),
                    });
                }
                Err(failure) => {
                    warn!(
                        register_number,
                        schedule_id = %schedule.id,
                        error = %failure.error,
                        "ticket issuance failed"
                    );
                    report.failed += 1;
                    report.errors.push(TicketFailure {
                        register_number: register_number.to_string(),
                        reason: failure.error.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }

    /// Issue one ticket: resolve the seat, build and sign the QR payload,
    /// render the PDF, upsert the row.
    async fn issue_one(
        &self,
        schedule: &Schedule,
        register_number: &str,
        actor: &str,
    ) -> Result<HallTicket, IssueFailure> {
        let student = self
            .store()
            .find_student_by_register_number(register_number)
            .await
            .map_err(IssueFailure::from_store)?;
        let seat = self
            .store()
            .get_student_seat(&schedule.id, &student.id)
            .await
            .map_err(IssueFailure::from_store)?;

        let payload = TicketPayload {
            register_number: register_number.to_string(),
            student_name: student.name.clone(),
            schedule_id: schedule.id.clone(),
            exam_type: schedule.exam_type,
            hall_number: seat.hall_number.clone(),
            seat_number: seat.seat_number,
            exam_date: schedule.start_date,
            session: schedule.session,
        };
        let qr_code_data = self
            .signer()
            .signed_qr_string(&payload)
            .map_err(|e| IssueFailure {
                error: EngineError::Signing(e),
            })?;

        // PDF rendering is part of issuance here, not a degraded path: the
        // student-facing artifact is the point of the operation.
        let pdf_path = self
            .artifact_oracle
            .ticket_pdf(&schedule.id, register_number)
            .await
            .map_err(|e| IssueFailure {
                error: EngineError::Artifact(e.to_string()),
            })?;

        self.store()
            .upsert_ticket(&NewTicket {
                student_id: student.id,
                schedule_id: schedule.id.clone(),
                register_number: register_number.to_string(),
                qr_code_data,
                pdf_path: Some(pdf_path),
                authorized_by: actor.to_string(),
            })
            .await
            .map_err(IssueFailure::from_store)
    }
}

/// A resolved ticket download: the contained filesystem path plus the
/// ticket with its download state updated.
#[derive(Debug)]
pub struct TicketDownload {
    pub path: PathBuf,
    pub ticket: HallTicket,
}

/// Per-student issuance failure, carried so bulk runs can report inline.
struct IssueFailure {
    error: EngineError,
}

impl IssueFailure {
    fn from_store(e: proctor_db::error::StoreError) -> Self {
        Self { error: e.into() }
    }
}
