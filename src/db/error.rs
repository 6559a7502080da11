use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::auth::CredentialError;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique index rejected the write (duplicate username or uuid).
    #[error("Record already exists: {0}")]
    AlreadyExists(String),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("Database error: {0}")]
    Database(DbErr),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Self::AlreadyExists(detail),
            _ => Self::Database(err),
        }
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}
