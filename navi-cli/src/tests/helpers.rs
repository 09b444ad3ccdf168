//! Fixtures shared by the CLI tests.

use camino::Utf8PathBuf;
use navi_core::StoreConfig;
use rstest::fixture;
use tempfile::TempDir;

/// A temporary directory holding the database file for one test.
pub(super) struct TempDatabase {
    _dir: TempDir,
    pub(super) config: StoreConfig,
}

#[fixture]
pub(super) fn temp_database() -> TempDatabase {
    let dir = TempDir::new().expect("create temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp dir");
    TempDatabase {
        config: StoreConfig::at_path(root.join("db/navi.sqlite")),
        _dir: dir,
    }
}

/// Captured command output as UTF-8.
pub(super) fn output_text(buffer: Vec<u8>) -> String {
    String::from_utf8(buffer).expect("command output is UTF-8")
}
