use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    /// Unique or foreign-key constraint rejected the write.
    #[error("constraint violation: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
}

impl From<DbErr> for ModelError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => return ModelError::Conflict(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => return ModelError::Conflict(msg),
            _ => {}
        }
        let msg = e.to_string();
        if msg.contains("UNIQUE constraint failed") || msg.contains("FOREIGN KEY constraint failed") {
            ModelError::Conflict(msg)
        } else {
            ModelError::Db(msg)
        }
    }
}

