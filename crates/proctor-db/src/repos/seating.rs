//! Seating allocation repository.
//!
//! Allocations for a schedule are written as one transactional batch and are
//! date-invariant: a student keeps the same hall and seat for every exam day
//! in the schedule.

use chrono::Utc;

use proctor_core::entities::SeatingAllocation;
use proctor_core::enums::AllocationMethod;
use proctor_core::ids::PREFIX_SEATING;

use crate::error::StoreError;
use crate::helpers::{get_opt_bool, get_opt_string, parse_datetime, parse_enum};
use crate::store::ExamStore;

/// One allocation to persist, produced by the seating oracle or the
/// deterministic fallback.
#[derive(Debug, Clone)]
pub struct NewAllocation {
    pub hall_id: String,
    pub hall_number: String,
    pub seat_number: i64,
    pub student_id: String,
    pub register_number: String,
    pub is_left_seat: Option<bool>,
}

const SEATING_COLUMNS: &str = "id, schedule_id, timetable_id, hall_id, hall_number, \
     seat_number, student_id, register_number, is_left_seat, allocation_method, created_at";

fn row_to_allocation(row: &libsql::Row) -> Result<SeatingAllocation, StoreError> {
    Ok(SeatingAllocation {
        id: row.get::<String>(0)?,
        schedule_id: row.get::<String>(1)?,
        timetable_id: get_opt_string(row, 2)?,
        hall_id: row.get::<String>(3)?,
        hall_number: row.get::<String>(4)?,
        seat_number: row.get::<i64>(5)?,
        student_id: row.get::<String>(6)?,
        register_number: row.get::<String>(7)?,
        is_left_seat: get_opt_bool(row, 8)?,
        allocation_method: parse_enum(&row.get::<String>(9)?)?,
        created_at: parse_datetime(&row.get::<String>(10)?)?,
    })
}

impl ExamStore {
    /// Replace a schedule's seating plan with a new batch, all or nothing.
    ///
    /// Existing allocations for the schedule are cleared inside the same
    /// transaction, so a failed batch leaves the previous plan intact.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` when the batch itself assigns the same
    /// seat twice or a student twice.
    pub async fn replace_seating(
        &self,
        schedule_id: &str,
        allocations: &[NewAllocation],
        method: AllocationMethod,
    ) -> Result<Vec<SeatingAllocation>, StoreError> {
        self.get_schedule(schedule_id).await?;

        let mut ids = Vec::with_capacity(allocations.len());
        for _ in allocations {
            ids.push(self.db().generate_id(PREFIX_SEATING).await?);
        }
        let now = Utc::now().to_rfc3339();

        let tx = self.db().conn().transaction().await?;
        let cleared = tx
            .execute(
                "DELETE FROM seating_allocations WHERE schedule_id = ?1",
                [schedule_id],
            )
            .await?;
        if cleared > 0 {
            tracing::debug!(schedule_id, cleared, "replacing existing seating plan");
        }
        for (allocation, id) in allocations.iter().zip(&ids) {
            tx.execute(
                "INSERT INTO seating_allocations (id, schedule_id, timetable_id, hall_id, \
                 hall_number, seat_number, student_id, register_number, is_left_seat, \
                 allocation_method, created_at) \
                 VALUES (?1, ?2, NULL, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                libsql::params![
                    id.as_str(),
                    schedule_id,
                    allocation.hall_id.as_str(),
                    allocation.hall_number.as_str(),
                    allocation.seat_number,
                    allocation.student_id.as_str(),
                    allocation.register_number.as_str(),
                    allocation.is_left_seat.map(i64::from),
                    method.as_str(),
                    now.as_str()
                ],
            )
            .await
            .map_err(StoreError::from_insert)?;
        }
        tx.commit().await?;

        self.list_seating(schedule_id).await
    }

    /// List a schedule's seating plan ordered by hall then seat.
    pub async fn list_seating(
        &self,
        schedule_id: &str,
    ) -> Result<Vec<SeatingAllocation>, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SEATING_COLUMNS} FROM seating_allocations \
                     WHERE schedule_id = ?1 ORDER BY hall_number, seat_number"
                ),
                [schedule_id],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_allocation(&row)?);
        }
        Ok(results)
    }

    /// Fetch one student's seat within a schedule.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the student holds no seat there.
    pub async fn get_student_seat(
        &self,
        schedule_id: &str,
        student_id: &str,
    ) -> Result<SeatingAllocation, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SEATING_COLUMNS} FROM seating_allocations \
                     WHERE schedule_id = ?1 AND student_id = ?2"
                ),
                libsql::params![schedule_id, student_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => row_to_allocation(&row),
            None => Err(StoreError::not_found("seating allocation", student_id)),
        }
    }
}
