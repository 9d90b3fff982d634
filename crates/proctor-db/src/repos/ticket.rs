//! Hall ticket repository.
//!
//! A ticket is unique per `(student, schedule)`. Re-issuing upserts the
//! credential material but refuses once the student has downloaded the
//! ticket, until a COE performs an explicit download reset.

use chrono::Utc;

use proctor_core::entities::HallTicket;
use proctor_core::enums::{AuditAction, EntityType};
use proctor_core::ids::PREFIX_TICKET;

use crate::error::StoreError;
use crate::helpers::{get_opt_string, parse_datetime, parse_optional_datetime};
use crate::store::ExamStore;

/// Credential material for issuing (or re-issuing) one ticket.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub student_id: String,
    pub schedule_id: String,
    pub register_number: String,
    pub qr_code_data: String,
    pub pdf_path: Option<String>,
    pub authorized_by: String,
}

const TICKET_COLUMNS: &str = "id, student_id, schedule_id, register_number, qr_code_data, \
     pdf_path, authorized, authorized_by, authorized_at, downloaded, downloaded_at, \
     created_at, updated_at";

fn row_to_ticket(row: &libsql::Row) -> Result<HallTicket, StoreError> {
    Ok(HallTicket {
        id: row.get::<String>(0)?,
        student_id: row.get::<String>(1)?,
        schedule_id: row.get::<String>(2)?,
        register_number: row.get::<String>(3)?,
        qr_code_data: row.get::<String>(4)?,
        pdf_path: get_opt_string(row, 5)?,
        authorized: row.get::<i64>(6)? != 0,
        authorized_by: get_opt_string(row, 7)?,
        authorized_at: parse_optional_datetime(get_opt_string(row, 8)?.as_deref())?,
        downloaded: row.get::<i64>(9)? != 0,
        downloaded_at: parse_optional_datetime(get_opt_string(row, 10)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(11)?)?,
        updated_at: parse_datetime(&row.get::<String>(12)?)?,
    })
}

impl ExamStore {
    /// Issue or re-issue a ticket for `(student, schedule)`.
    ///
    /// A fresh issue inserts; a re-issue overwrites the QR payload and PDF
    /// path while preserving `downloaded` / `downloaded_at`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidState` when the existing ticket has been
    /// downloaded — re-issue requires a download reset first.
    pub async fn upsert_ticket(&self, new: &NewTicket) -> Result<HallTicket, StoreError> {
        let now = Utc::now().to_rfc3339();

        if let Some(existing) = self
            .find_ticket(&new.student_id, &new.schedule_id)
            .await?
        {
            if existing.downloaded {
                return Err(StoreError::InvalidState(format!(
                    "Ticket {} has been downloaded; reset the download before re-issuing",
                    existing.id
                )));
            }
            self.db()
                .conn()
                .execute(
                    "UPDATE hall_tickets SET register_number = ?1, qr_code_data = ?2, \
                     pdf_path = ?3, authorized = 1, authorized_by = ?4, authorized_at = ?5, \
                     updated_at = ?5 WHERE id = ?6",
                    libsql::params![
                        new.register_number.as_str(),
                        new.qr_code_data.as_str(),
                        new.pdf_path.as_deref(),
                        new.authorized_by.as_str(),
                        now.as_str(),
                        existing.id.as_str()
                    ],
                )
                .await?;
            self.append_audit_for(
                EntityType::HallTicket,
                &existing.id,
                AuditAction::Issued,
                Some(&new.authorized_by),
                Some(serde_json::json!({ "reissue": true })),
            )
            .await?;
            return self.get_ticket(&existing.id).await;
        }

        let id = self.db().generate_id(PREFIX_TICKET).await?;
        self.db()
            .conn()
            .execute(
                "INSERT INTO hall_tickets (id, student_id, schedule_id, register_number, \
                 qr_code_data, pdf_path, authorized, authorized_by, authorized_at, \
                 downloaded, downloaded_at, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?8, 0, NULL, ?8, ?8)",
                libsql::params![
                    id.as_str(),
                    new.student_id.as_str(),
                    new.schedule_id.as_str(),
                    new.register_number.as_str(),
                    new.qr_code_data.as_str(),
                    new.pdf_path.as_deref(),
                    new.authorized_by.as_str(),
                    now.as_str()
                ],
            )
            .await
            .map_err(StoreError::from_insert)?;

        self.append_audit_for(
            EntityType::HallTicket,
            &id,
            AuditAction::Issued,
            Some(&new.authorized_by),
            None,
        )
        .await?;

        self.get_ticket(&id).await
    }

    /// Fetch one ticket by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the ID is unknown.
    pub async fn get_ticket(&self, id: &str) -> Result<HallTicket, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {TICKET_COLUMNS} FROM hall_tickets WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => row_to_ticket(&row),
            None => Err(StoreError::not_found("hall ticket", id)),
        }
    }

    /// Look up the ticket for `(student, schedule)`, if one exists.
    pub async fn find_ticket(
        &self,
        student_id: &str,
        schedule_id: &str,
    ) -> Result<Option<HallTicket>, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {TICKET_COLUMNS} FROM hall_tickets \
                     WHERE student_id = ?1 AND schedule_id = ?2"
                ),
                libsql::params![student_id, schedule_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => row_to_ticket(&row).map(Some),
            None => Ok(None),
        }
    }

    /// List all tickets for a schedule, ordered by register number.
    pub async fn list_tickets(&self, schedule_id: &str) -> Result<Vec<HallTicket>, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {TICKET_COLUMNS} FROM hall_tickets \
                     WHERE schedule_id = ?1 ORDER BY register_number"
                ),
                [schedule_id],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_ticket(&row)?);
        }
        Ok(results)
    }

    /// Record that the student downloaded their ticket. Idempotent: the first
    /// download timestamp is kept on repeat calls.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the ID is unknown.
    pub async fn mark_ticket_downloaded(&self, id: &str) -> Result<HallTicket, StoreError> {
        let ticket = self.get_ticket(id).await?;
        if ticket.downloaded {
            return Ok(ticket);
        }
        let now = Utc::now().to_rfc3339();
        self.db()
            .conn()
            .execute(
                "UPDATE hall_tickets SET downloaded = 1, downloaded_at = ?1, updated_at = ?1 \
                 WHERE id = ?2",
                libsql::params![now.as_str(), id],
            )
            .await?;
        self.get_ticket(id).await
    }

    /// Clear the download flag so the ticket can be re-issued. COE-only at
    /// the engine layer; the store records who asked.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the ID is unknown.
    pub async fn reset_ticket_download(
        &self,
        id: &str,
        actor: &str,
    ) -> Result<HallTicket, StoreError> {
        self.get_ticket(id).await?;
        let now = Utc::now().to_rfc3339();
        self.db()
            .conn()
            .execute(
                "UPDATE hall_tickets SET downloaded = 0, downloaded_at = NULL, updated_at = ?1 \
                 WHERE id = ?2",
                libsql::params![now.as_str(), id],
            )
            .await?;
        self.append_audit_for(
            EntityType::HallTicket,
            id,
            AuditAction::DownloadReset,
            Some(actor),
            None,
        )
        .await?;
        self.get_ticket(id).await
    }
}
