//! Assertion helpers for testing

use baseline::domain::entities::{RepositoryDescriptor, SyncOutcome};
use std::collections::HashSet;
use std::path::Path;
use walkdir::WalkDir;

/// Assert that a directory exists
#[macro_export]
macro_rules! assert_dir_exists {
    ($path:expr) => {
        assert!($path.is_dir(), "Directory should exist: {}", $path.display());
    };
}

/// Assert that nothing exists at the path
#[macro_export]
macro_rules! assert_path_not_exists {
    ($path:expr) => {
        assert!(!$path.exists(), "Path should not exist: {}", $path.display());
    };
}

/// Every input descriptor appears in exactly one outcome and nothing else does
pub fn assert_one_outcome_per_repository(
    inputs: &[RepositoryDescriptor],
    outcomes: &[SyncOutcome],
) {
    assert_eq!(
        outcomes.len(),
        inputs.len(),
        "expected one outcome per repository"
    );

    let mut seen = HashSet::new();
    for outcome in outcomes {
        assert!(
            seen.insert(outcome.repository.full_name.clone()),
            "duplicate outcome for {}",
            outcome.repository.full_name
        );
    }

    let expected: HashSet<String> = inputs.iter().map(|r| r.full_name.clone()).collect();
    assert_eq!(seen, expected);
}

/// Every directory is r-x and every file r-- for all classes
#[cfg(unix)]
pub fn assert_tree_read_only(root: &Path) {
    use std::os::unix::fs::PermissionsExt;

    for entry in WalkDir::new(root) {
        let entry = entry.unwrap();
        if entry.path_is_symlink() {
            continue;
        }

        let mode = entry.metadata().unwrap().permissions().mode() & 0o777;
        let expected = if entry.file_type().is_dir() { 0o555 } else { 0o444 };
        assert_eq!(
            mode,
            expected,
            "unexpected mode {:o} on {}",
            mode,
            entry.path().display()
        );
    }
}

#[cfg(not(unix))]
pub fn assert_tree_read_only(root: &Path) {
    for entry in WalkDir::new(root) {
        let entry = entry.unwrap();
        if entry.file_type().is_file() {
            assert!(entry.metadata().unwrap().permissions().readonly());
        }
    }
}
