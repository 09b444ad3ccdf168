//! Errors raised by the SQLite navigation store.

use camino::Utf8PathBuf;
use log::error;
use rusqlite::Error as SqliteError;
use thiserror::Error;

use crate::store::InvalidTableIndex;

/// Errors raised when opening or operating on a navigation database.
#[derive(Debug, Error)]
pub enum NaviStoreError {
    /// Failed to create the parent directory of the database file.
    #[error("failed to create parent directory {path:?}")]
    CreateDirectory {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path:?}")]
    Open {
        /// Database path.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Configuring foreign-key enforcement failed.
    #[error("failed to configure SQLite foreign keys")]
    ForeignKeys {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// A table was addressed by an index outside the managed set.
    #[error(transparent)]
    InvalidTableIndex(#[from] InvalidTableIndex),
    /// An identifier cannot be represented as an SQLite integer.
    #[error("{field} {value} exceeds SQLite i64 range")]
    IdOutOfRange {
        /// Column the value was destined for.
        field: &'static str,
        /// Rejected value.
        value: u64,
    },
    /// A stored column holds a value the domain model cannot represent.
    #[error("stored {field} value {value} is invalid")]
    InvalidStoredValue {
        /// Column the value was read from.
        field: &'static str,
        /// Raw stored value.
        value: i64,
    },
    /// A statement failed.
    #[error("SQLite operation `{operation}` failed")]
    Sqlite {
        /// Operation that was running.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Another thread panicked while holding the shared store.
    #[error("navigation store lock was poisoned")]
    LockPoisoned,
}

/// Log a driver failure and wrap it with the operation that was running.
pub(super) fn sqlite_failure(
    operation: &'static str,
) -> impl FnOnce(SqliteError) -> NaviStoreError {
    move |source| {
        error!("{operation} failed: {source}");
        NaviStoreError::Sqlite { operation, source }
    }
}
