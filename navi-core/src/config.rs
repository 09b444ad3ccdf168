//! Store configuration.

use std::time::Duration;

use camino::Utf8PathBuf;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// File name of the navigation database when no path is configured.
pub const DEFAULT_DATABASE_FILE: &str = "navi.sqlite";

/// Maximum number of rows a navigation shard table may hold before the
/// allocator moves on to the next shard.
pub const MAX_ROWS_PER_SHARD: u64 = 10_000;

/// How long a connection waits on a locked database before failing.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings used when opening a navigation store.
///
/// Deserialises with defaults for any missing field, so an empty document
/// yields [`StoreConfig::default`].
///
/// # Examples
///
/// ```
/// use navi_core::{MAX_ROWS_PER_SHARD, StoreConfig};
///
/// let config = StoreConfig::default();
/// assert_eq!(config.database_path.as_str(), "navi.sqlite");
/// assert_eq!(config.max_rows_per_shard, MAX_ROWS_PER_SHARD);
/// assert!(config.enforce_foreign_keys);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct StoreConfig {
    /// Location of the SQLite file.
    pub database_path: Utf8PathBuf,
    /// Row threshold for navigation shard selection.
    pub max_rows_per_shard: u64,
    /// Whether SQLite enforces the schema's foreign keys and cascades.
    pub enforce_foreign_keys: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: Utf8PathBuf::from(DEFAULT_DATABASE_FILE),
            max_rows_per_shard: MAX_ROWS_PER_SHARD,
            enforce_foreign_keys: true,
        }
    }
}

impl StoreConfig {
    /// Default settings for a database at `path`.
    pub fn at_path(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            database_path: path.into(),
            ..Self::default()
        }
    }

    /// Override the shard row threshold.
    #[must_use]
    pub const fn with_max_rows_per_shard(mut self, max_rows_per_shard: u64) -> Self {
        self.max_rows_per_shard = max_rows_per_shard;
        self
    }

    /// Toggle foreign-key enforcement.
    #[must_use]
    pub const fn with_foreign_keys(mut self, enforce_foreign_keys: bool) -> Self {
        self.enforce_foreign_keys = enforce_foreign_keys;
        self
    }
}
