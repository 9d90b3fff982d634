//! Audit trail repository — append and query.

use chrono::Utc;

use proctor_core::entities::AuditEntry;
use proctor_core::enums::{AuditAction, EntityType};
use proctor_core::ids::PREFIX_AUDIT;

use crate::error::StoreError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum};
use crate::store::ExamStore;

fn row_to_entry(row: &libsql::Row) -> Result<AuditEntry, StoreError> {
    let detail = match get_opt_string(row, 5)? {
        Some(raw) => Some(
            serde_json::from_str(&raw)
                .map_err(|e| StoreError::Query(format!("Invalid JSON in audit detail: {e}")))?,
        ),
        None => None,
    };
    Ok(AuditEntry {
        id: row.get::<String>(0)?,
        entity_type: parse_enum(&row.get::<String>(1)?)?,
        entity_id: row.get::<String>(2)?,
        action: parse_enum(&row.get::<String>(3)?)?,
        actor: get_opt_string(row, 4)?,
        detail,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl ExamStore {
    /// Append one audit trail entry for an entity mutation.
    pub async fn append_audit_for(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        action: AuditAction,
        actor: Option<&str>,
        detail: Option<serde_json::Value>,
    ) -> Result<(), StoreError> {
        let id = self.db().generate_id(PREFIX_AUDIT).await?;
        let detail_text = match &detail {
            Some(value) => Some(
                serde_json::to_string(value)
                    .map_err(|e| StoreError::Query(format!("Failed to serialize detail: {e}")))?,
            ),
            None => None,
        };

        self.db()
            .conn()
            .execute(
                "INSERT INTO audit_trail (id, entity_type, entity_id, action, actor, detail, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    id.as_str(),
                    entity_type.as_str(),
                    entity_id,
                    action.as_str(),
                    actor,
                    detail_text.as_deref(),
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        Ok(())
    }

    /// List audit entries for one entity, oldest first.
    pub async fn list_audit_for(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<Vec<AuditEntry>, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, entity_type, entity_id, action, actor, detail, created_at \
                 FROM audit_trail WHERE entity_type = ?1 AND entity_id = ?2 \
                 ORDER BY created_at ASC, id ASC",
                libsql::params![entity_type.as_str(), entity_id],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_entry(&row)?);
        }
        Ok(results)
    }
}
