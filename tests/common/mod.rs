#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use proclog::{
    data::LogValue,
    kind::ColumnKind,
    source::{LogColumn, LogTable},
};
use tempfile::{TempDir, tempdir};

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Builds an in-memory log from column declarations and rows.
pub fn log_table(name: &str, columns: &[(&str, ColumnKind)], rows: Vec<Vec<LogValue>>) -> LogTable {
    let columns = columns
        .iter()
        .map(|(name, kind)| LogColumn::new(*name, *kind))
        .collect();
    let mut table = LogTable::new(name, columns).expect("log table");
    for row in rows {
        table.add_row(row).expect("add row");
    }
    table
}

/// The timestamp/cpu/status run log used across the conversion tests.
pub fn run_log() -> LogTable {
    log_table(
        "run",
        &[
            ("timestamp", ColumnKind::DateTime),
            ("cpu", ColumnKind::Numeric),
            ("status", ColumnKind::Categorical),
        ],
        vec![
            vec![LogValue::Number(100.0), LogValue::Number(0.5), "ok".into()],
            vec![LogValue::Number(200.0), LogValue::Number(0.7), "fail".into()],
            vec![LogValue::Number(300.0), LogValue::Number(0.9), "ok".into()],
        ],
    )
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}
