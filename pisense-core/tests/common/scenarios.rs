//! Prepared calibration store contents

use std::fs;
use std::path::Path;

use pisense_core::calibration::CalibrationStore;
use tempfile::TempDir;

/// Store file name used by every scenario
pub const STORE_FILE: &str = "sgp30.json";

/// Empty directory, no store file yet
pub fn fresh_store() -> (TempDir, CalibrationStore) {
    let dir = TempDir::new().unwrap();
    let store = CalibrationStore::new(dir.path().join(STORE_FILE));
    (dir, store)
}

/// Store holding `{"SN123": {"baseline_primary": 400, "baseline_secondary": 10}}`
pub fn store_with_sn123() -> (TempDir, CalibrationStore) {
    let (dir, store) = fresh_store();
    write_raw(
        store.path(),
        r#"{"SN123": {"baseline_primary": 400, "baseline_secondary": 10}}"#,
    );
    (dir, store)
}

pub fn write_raw(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}
