#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use cascade_core::{
    core::RelationIndex,
    domain::RelationRecord,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Records from the area endpoint fixture, parsed once.
pub static FIXTURE_RECORDS: Lazy<Vec<RelationRecord>> = Lazy::new(|| {
    let data = std::fs::read_to_string(fixture_path("areas.json")).expect("read fixture");
    serde_json::from_str(&data).expect("parse fixture")
});

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn fixture_index() -> Arc<RelationIndex> {
    Arc::new(RelationIndex::build(&FIXTURE_RECORDS))
}

/// The four-row dataset used throughout the documentation examples.
pub fn scenario_records() -> Vec<RelationRecord> {
    vec![
        RelationRecord::new((1, "A"), (10, "L1"), (100, "X")),
        RelationRecord::new((1, "A"), (10, "L1"), (101, "Y")),
        RelationRecord::new((1, "A"), (11, "L2"), (102, "Z")),
        RelationRecord::new((2, "B"), (12, "L3"), (103, "W")),
    ]
}

/// Unique directory that outlives the calling test.
pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}
