//! Hall repository.
//!
//! `exam_capacity` is derived once here, at creation or update, and treated
//! as a stored fact everywhere else — the seating allocator never recomputes
//! it per exam.

use chrono::Utc;

use proctor_core::entities::Hall;
use proctor_core::enums::{AuditAction, EntityType};
use proctor_core::ids::PREFIX_HALL;

use crate::error::StoreError;
use crate::helpers::{parse_datetime, parse_string_list, to_json_list};
use crate::store::ExamStore;

/// Parameters for creating or updating a hall.
#[derive(Debug, Clone)]
pub struct NewHall {
    pub hall_number: String,
    pub capacity: i64,
    /// Defaults to `capacity / 2` (floor) when `None` — the
    /// two-students-per-bench halving rule.
    pub exam_capacity: Option<i64>,
    pub columns: i64,
    pub building: String,
    pub floor: i64,
    pub facilities: Vec<String>,
}

fn row_to_hall(row: &libsql::Row) -> Result<Hall, StoreError> {
    Ok(Hall {
        id: row.get::<String>(0)?,
        hall_number: row.get::<String>(1)?,
        capacity: row.get::<i64>(2)?,
        exam_capacity: row.get::<i64>(3)?,
        columns: row.get::<i64>(4)?,
        building: row.get::<String>(5)?,
        floor: row.get::<i64>(6)?,
        facilities: parse_string_list(&row.get::<String>(7)?)?,
        is_active: row.get::<i64>(8)? != 0,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
        updated_at: parse_datetime(&row.get::<String>(10)?)?,
    })
}

const HALL_COLUMNS: &str = "id, hall_number, capacity, exam_capacity, columns, building, \
     floor, facilities, is_active, created_at, updated_at";

fn resolve_exam_capacity(new: &NewHall) -> Result<i64, StoreError> {
    let exam_capacity = new
        .exam_capacity
        .unwrap_or_else(|| Hall::derive_exam_capacity(new.capacity));
    if exam_capacity > new.capacity {
        return Err(StoreError::InvalidState(format!(
            "exam_capacity {exam_capacity} exceeds capacity {} for hall {}",
            new.capacity, new.hall_number
        )));
    }
    Ok(exam_capacity)
}

impl ExamStore {
    /// Create a hall.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` on a duplicate hall number and
    /// `StoreError::InvalidState` when `exam_capacity > capacity`.
    pub async fn create_hall(&self, new: &NewHall) -> Result<Hall, StoreError> {
        let exam_capacity = resolve_exam_capacity(new)?;
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_HALL).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO halls (id, hall_number, capacity, exam_capacity, columns, \
                 building, floor, facilities, is_active, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9, ?9)",
                libsql::params![
                    id.as_str(),
                    new.hall_number.as_str(),
                    new.capacity,
                    exam_capacity,
                    new.columns,
                    new.building.as_str(),
                    new.floor,
                    to_json_list(&new.facilities)?,
                    now.to_rfc3339()
                ],
            )
            .await
            .map_err(StoreError::from_insert)?;

        self.append_audit_for(EntityType::Hall, &id, AuditAction::Created, None, None)
            .await?;

        self.get_hall(&id).await
    }

    /// Update a hall's dimensions, re-deriving `exam_capacity` where unset.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown ID,
    /// `StoreError::InvalidState` when `exam_capacity > capacity`.
    pub async fn update_hall(&self, id: &str, new: &NewHall) -> Result<Hall, StoreError> {
        self.get_hall(id).await?;
        let exam_capacity = resolve_exam_capacity(new)?;
        let now = Utc::now();

        self.db()
            .conn()
            .execute(
                "UPDATE halls SET hall_number = ?1, capacity = ?2, exam_capacity = ?3, \
                 columns = ?4, building = ?5, floor = ?6, facilities = ?7, updated_at = ?8 \
                 WHERE id = ?9",
                libsql::params![
                    new.hall_number.as_str(),
                    new.capacity,
                    exam_capacity,
                    new.columns,
                    new.building.as_str(),
                    new.floor,
                    to_json_list(&new.facilities)?,
                    now.to_rfc3339(),
                    id
                ],
            )
            .await
            .map_err(StoreError::from_insert)?;

        self.append_audit_for(EntityType::Hall, id, AuditAction::Updated, None, None)
            .await?;

        self.get_hall(id).await
    }

    /// Fetch one hall by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the ID is unknown.
    pub async fn get_hall(&self, id: &str) -> Result<Hall, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {HALL_COLUMNS} FROM halls WHERE id = ?1"), [id])
            .await?;
        match rows.next().await? {
            Some(row) => row_to_hall(&row),
            None => Err(StoreError::not_found("hall", id)),
        }
    }

    /// Fetch one hall by its unique hall number.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no hall carries the number.
    pub async fn get_hall_by_number(&self, hall_number: &str) -> Result<Hall, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {HALL_COLUMNS} FROM halls WHERE hall_number = ?1"),
                [hall_number],
            )
            .await?;
        match rows.next().await? {
            Some(row) => row_to_hall(&row),
            None => Err(StoreError::not_found("hall", hall_number)),
        }
    }

    /// List halls, optionally only active ones, by hall number.
    pub async fn list_halls(&self, active_only: bool) -> Result<Vec<Hall>, StoreError> {
        let sql = if active_only {
            format!("SELECT {HALL_COLUMNS} FROM halls WHERE is_active = 1 ORDER BY hall_number")
        } else {
            format!("SELECT {HALL_COLUMNS} FROM halls ORDER BY hall_number")
        };
        let mut rows = self.db().conn().query(&sql, ()).await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_hall(&row)?);
        }
        Ok(results)
    }
}
