//! Domain-level error types.

use thiserror::Error;

use crate::domain::EntityKind;

/// Domain errors - failures surfaced to callers of the core.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: EntityKind, id: i64 },

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Referential integrity violated: {0}")]
    ReferentialIntegrity(String),

    #[error("{kind} has no relation {relation}")]
    InvalidRelation {
        kind: EntityKind,
        relation: &'static str,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: EntityKind, id: i64 },

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Referential integrity violated: {0}")]
    ReferentialIntegrity(String),
}

impl DomainError {
    /// A stored foreign key points at a row that no longer exists.
    pub fn dangling(target: EntityKind, id: i64, referenced_by: impl std::fmt::Display) -> Self {
        DomainError::ReferentialIntegrity(format!(
            "{referenced_by} references missing {target} {id}"
        ))
    }
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { entity, id } => DomainError::NotFound {
                entity_type: entity,
                id,
            },
            RepoError::ConstraintViolation(msg) => DomainError::ConstraintViolation(msg),
            RepoError::ReferentialIntegrity(msg) => DomainError::ReferentialIntegrity(msg),
            RepoError::Connection(msg) | RepoError::Query(msg) => DomainError::Internal(msg),
        }
    }
}
