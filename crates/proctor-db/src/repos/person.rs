//! Person repository: students, faculty, and the examinations controller.

use chrono::Utc;

use proctor_core::entities::Person;
use proctor_core::enums::{AuditAction, EntityType, PersonRole};
use proctor_core::ids::PREFIX_PERSON;

use crate::error::StoreError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum};
use crate::store::ExamStore;

/// Parameters for creating a person.
#[derive(Debug, Clone)]
pub struct NewPerson {
    pub register_number: Option<String>,
    pub name: String,
    pub role: PersonRole,
    pub year: Option<i64>,
    pub department: Option<String>,
}

const PERSON_COLUMNS: &str =
    "id, register_number, name, role, year, department, is_active, created_at";

fn row_to_person(row: &libsql::Row) -> Result<Person, StoreError> {
    Ok(Person {
        id: row.get::<String>(0)?,
        register_number: get_opt_string(row, 1)?,
        name: row.get::<String>(2)?,
        role: parse_enum(&row.get::<String>(3)?)?,
        year: match row.get_value(4)? {
            libsql::Value::Null => None,
            libsql::Value::Integer(n) => Some(n),
            other => {
                return Err(StoreError::Query(format!(
                    "Unexpected value for year column: {other:?}"
                )));
            }
        },
        department: get_opt_string(row, 5)?,
        is_active: row.get::<i64>(6)? != 0,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl ExamStore {
    /// Create a person.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` on a duplicate register number.
    pub async fn create_person(&self, new: &NewPerson) -> Result<Person, StoreError> {
        let id = self.db().generate_id(PREFIX_PERSON).await?;
        let now = Utc::now();

        self.db()
            .conn()
            .execute(
                "INSERT INTO persons (id, register_number, name, role, year, department, \
                 is_active, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7)",
                libsql::params![
                    id.as_str(),
                    new.register_number.as_deref(),
                    new.name.as_str(),
                    new.role.as_str(),
                    new.year,
                    new.department.as_deref(),
                    now.to_rfc3339()
                ],
            )
            .await
            .map_err(StoreError::from_insert)?;

        self.append_audit_for(EntityType::Person, &id, AuditAction::Created, None, None)
            .await?;

        self.get_person(&id).await
    }

    /// Fetch one person by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the ID is unknown.
    pub async fn get_person(&self, id: &str) -> Result<Person, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {PERSON_COLUMNS} FROM persons WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => row_to_person(&row),
            None => Err(StoreError::not_found("person", id)),
        }
    }

    /// Resolve an active student by register number.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` when no active student carries the
    /// number. Inactive students and non-student roles do not match.
    pub async fn find_student_by_register_number(
        &self,
        register_number: &str,
    ) -> Result<Person, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {PERSON_COLUMNS} FROM persons \
                     WHERE register_number = ?1 AND role = 'student' AND is_active = 1"
                ),
                [register_number],
            )
            .await?;
        match rows.next().await? {
            Some(row) => row_to_person(&row),
            None => Err(StoreError::not_found("student", register_number)),
        }
    }

    /// List active students in a given year of study, ordered by register
    /// number. This ordering is what makes fallback seat allocation
    /// deterministic.
    pub async fn list_students_by_year(&self, year: i64) -> Result<Vec<Person>, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {PERSON_COLUMNS} FROM persons \
                     WHERE role = 'student' AND year = ?1 AND is_active = 1 \
                     ORDER BY register_number"
                ),
                [year],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_person(&row)?);
        }
        Ok(results)
    }

    /// List all active persons with a given role, ordered by name.
    pub async fn list_persons_by_role(&self, role: PersonRole) -> Result<Vec<Person>, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {PERSON_COLUMNS} FROM persons \
                     WHERE role = ?1 AND is_active = 1 ORDER BY name"
                ),
                [role.as_str()],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_person(&row)?);
        }
        Ok(results)
    }
}
