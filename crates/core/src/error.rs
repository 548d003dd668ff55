use crate::types::DbId;

/// Domain-level error taxonomy.
///
/// `Conflict`, `Forbidden`, `Unauthorized`, and `NotFound` propagate to the
/// boundary layer for translation into protocol responses. `Storage` is a
/// persistence fault and is always propagated, never swallowed.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
