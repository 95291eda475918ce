//! Error types for the agenda core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in entity operations.
///
/// Lookups that match nothing are not errors: single-document queries return
/// `None` and update/delete report zero counts.
#[derive(Error, Debug)]
pub enum AgendaError {
    /// A required field is absent, empty, or fails its format rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A cross-entity lookup found no match, so nothing was written.
    #[error("Reference error: {0}")]
    Reference(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures of the underlying document store itself.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database at {} is already opened by another process", .0.display())]
    Locked(PathBuf),

    #[error("Document with _id '{id}' already exists in '{collection}'")]
    DuplicateId { collection: String, id: String },

    #[error("Invalid collection name '{0}'")]
    InvalidCollection(String),

    #[error("Collection '{collection}' is corrupt: {reason}")]
    Corrupt { collection: String, reason: String },

    #[error("Store is closed")]
    Closed,
}

/// Result type alias for agenda operations.
pub type AgendaResult<T> = Result<T, AgendaError>;

/// Result type alias for raw store calls.
pub type StoreResult<T> = Result<T, StoreError>;
