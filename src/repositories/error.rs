use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Failure modes of every repository operation.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{entity} {key} not found")]
    NotFound { entity: &'static str, key: String },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(DbErr),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

impl From<DbErr> for RepositoryError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                return Self::Conflict(format!("duplicate value ({detail})"));
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                return Self::Conflict(format!("referenced row is missing or still in use ({detail})"));
            }
            _ => {}
        }

        match err {
            DbErr::RecordNotFound(detail) => Self::NotFound {
                entity: "record",
                key: detail,
            },
            DbErr::RecordNotUpdated => Self::NotFound {
                entity: "record",
                key: "to update".to_string(),
            },
            other => Self::Database(other),
        }
    }
}
