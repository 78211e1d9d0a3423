//! Errores de persistencia.
//! Mapea errores de Diesel / pool / migraciones a variantes semánticas.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use nutri_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("unique violation: {0}")]
    UniqueViolation(String),
    #[error("check violation: {0}")]
    CheckViolation(String),
    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),
    #[error("not found")]
    NotFound,
    #[error("serialization conflict (retryable)")]
    SerializationConflict,
    #[error("transient IO / connection pool error: {0}")]
    TransientIo(String),
    #[error("migration error: {0}")]
    Migration(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("upstream food source: {0}")]
    Upstream(#[from] DomainError),
    #[error("unknown database error: {0}")]
    Unknown(String),
}

impl From<DieselError> for PersistenceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(kind, info) => {
                let msg = info.message().to_string();
                match kind {
                    DatabaseErrorKind::UniqueViolation => Self::UniqueViolation(msg),
                    DatabaseErrorKind::CheckViolation => Self::CheckViolation(msg),
                    DatabaseErrorKind::ForeignKeyViolation => Self::ForeignKeyViolation(msg),
                    DatabaseErrorKind::SerializationFailure => Self::SerializationConflict,
                    DatabaseErrorKind::ClosedConnection => Self::TransientIo(msg),
                    other => Self::Unknown(format!("db error kind {other:?}: {msg}")),
                }
            }
            DieselError::BrokenTransactionManager => Self::TransientIo("broken transaction manager".into()),
            DieselError::DeserializationError(e) => Self::Unknown(format!("deser: {e}")),
            DieselError::SerializationError(e) => Self::Unknown(format!("ser: {e}")),
            DieselError::QueryBuilderError(e) => Self::Unknown(format!("query builder: {e}")),
            other => Self::Unknown(format!("unhandled diesel error: {other:?}")),
        }
    }
}

impl From<r2d2::Error> for PersistenceError {
    fn from(err: r2d2::Error) -> Self {
        Self::TransientIo(format!("pool error: {err}"))
    }
}
