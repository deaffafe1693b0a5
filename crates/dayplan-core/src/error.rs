//! Core error types for dayplan-core.
//!
//! Errors come in two tiers. `PlanError` is fatal: it aborts the current
//! planning run and is surfaced to the caller as a single error result.
//! Everything softer is handled in place -- missing configuration rows are
//! substituted with defaults and never reach this module, and best-effort
//! writes (task deferral updates) are logged and swallowed at the call site.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal error for a planning run.
#[derive(Error, Debug)]
pub enum PlanError {
    /// Storage-related errors on a required record
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A daily mode could not be found or created
    #[error("Could not resolve a daily mode for user '{user}' on {date}")]
    ModeUnresolved { user: String, date: NaiveDate },

    /// A daily plan row could not be found or created
    #[error("Could not find or create a daily plan for user '{user}' on {date}")]
    PlanUnresolved { user: String, date: NaiveDate },
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for PlanError
pub type Result<T, E = PlanError> = std::result::Result<T, E>;
