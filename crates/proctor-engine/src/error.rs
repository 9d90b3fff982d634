//! Engine error taxonomy.
//!
//! Propagation policy: validation / not-found / not-authorized errors go
//! straight to the caller with no retry; a seating oracle failure triggers
//! the deterministic fallback instead of surfacing; artifact failures inside
//! the scheduling pipeline are logged warnings, never pipeline failures.

use thiserror::Error;

use proctor_db::error::StoreError;
use proctor_qr::SignError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or incomplete request, rejected before any external call.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {entity} {id}")]
    NotFound { entity: String, id: String },

    /// Authorization-gated action attempted before explicit authorization.
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// Uniqueness violation: duplicate seat, ticket, or exam cycle.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// PDF or filesystem failure outside the graceful-degradation paths.
    #[error("Artifact error: {0}")]
    Artifact(String),

    #[error(transparent)]
    Signing(#[from] SignError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for EngineError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { entity_type, id } => Self::NotFound {
                entity: entity_type,
                id,
            },
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::InvalidState(msg) => Self::Validation(msg),
            other => Self::Store(other),
        }
    }
}
