use sqlx::Error as SqlxError;
use sqlx::error::ErrorKind;
use std::time::Duration;
use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[error("Unique constraint violated on column `{column}`")]
    UniqueViolation { column: String },

    #[error("Schema initialization did not finish within {0:?}")]
    InitTimeout(Duration),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation { .. })
    }

    /// Column named by a uniqueness failure, if this is one.
    pub fn violated_column(&self) -> Option<&str> {
        match self {
            StoreError::UniqueViolation { column } => Some(column.as_str()),
            _ => None,
        }
    }
}

impl From<SqlxError> for StoreError {
    fn from(e: SqlxError) -> Self {
        if let SqlxError::Database(db_err) = &e
            && db_err.kind() == ErrorKind::UniqueViolation
        {
            return StoreError::UniqueViolation {
                column: unique_column(db_err.message()),
            };
        }
        StoreError::Database(e)
    }
}

impl From<figment::Error> for StoreError {
    fn from(e: figment::Error) -> Self {
        StoreError::Config(Box::new(e))
    }
}

/// SQLite reports `UNIQUE constraint failed: users.email`; keep the bare column.
fn unique_column(message: &str) -> String {
    message
        .rsplit(": ")
        .next()
        .and_then(|target| target.split(',').next())
        .map(|qualified| qualified.trim())
        .map(|qualified| qualified.rsplit('.').next().unwrap_or(qualified))
        .unwrap_or(message)
        .to_string()
}
