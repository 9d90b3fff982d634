use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::PersonRole;

/// A student, faculty member, or examinations controller.
///
/// Identity only — no credential material is stored here; authentication
/// transport lives outside this system's boundary.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Person {
    pub id: String,
    pub register_number: Option<String>,
    pub name: String,
    pub role: PersonRole,
    pub year: Option<i64>,
    pub department: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
