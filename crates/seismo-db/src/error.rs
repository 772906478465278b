//! Error types for database discovery.

use seismo_common::MetadataError;
use thiserror::Error;

/// Result type for database operations.
pub type DbResult<T> = Result<T, DatabaseError>;

/// Errors raised while locating or opening a database.
///
/// All of these are fatal at startup: a process without a database cannot
/// serve requests.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// No data files under the given root.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Files were found but do not form a consistent layout.
    #[error("Invalid database layout: {0}")]
    Config(String),

    /// Metadata inconsistent with the layout.
    #[error(transparent)]
    InvalidMetadata(#[from] MetadataError),

    /// An extent query could not be answered.
    #[error("Invalid extent request: {0}")]
    InvalidExtent(String),
}
