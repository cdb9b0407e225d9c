//! Property-based tests for registry deduplication

use std::path::{Path, PathBuf};

use proptest::prelude::*;
use teikoku_files::{FileRecord, FileRegistry};

fn record(path: &Path, marker: usize) -> FileRecord {
    let mut record = FileRecord::new();
    record.set_path(path);
    let bytes = marker.to_le_bytes().to_vec();
    record.set_loaded_bytes(bytes.len() as u64);
    record.set_buffer(bytes);
    record
}

/// Two records with the same path: the first stays, the second is refused
#[test]
fn prop_same_path_twice_keeps_first() {
    let mut registry = FileRegistry::new();
    let path = PathBuf::from("/staged/config.xml");

    assert!(registry.insert(record(&path, 1)));
    assert!(!registry.insert(record(&path, 2)));

    assert_eq!(registry.len(), 1);
    assert_eq!(
        registry.find_by_path(&path).unwrap().buffer(),
        1usize.to_le_bytes()
    );
}

proptest! {
    /// For any selection sequence the registry holds each path once, in
    /// order of first selection, with the content of that first selection
    #[test]
    fn prop_registry_keeps_first_occurrence(picks in prop::collection::vec(0usize..8, 0..40)) {
        let mut registry = FileRegistry::new();
        let mut expected: Vec<(PathBuf, usize)> = Vec::new();

        for (marker, pick) in picks.iter().enumerate() {
            let path = PathBuf::from(format!("/staged/file-{pick}.txt"));
            let inserted = registry.insert(record(&path, marker));
            let seen = expected.iter().any(|(p, _)| *p == path);

            prop_assert_eq!(inserted, !seen);
            if !seen {
                expected.push((path, marker));
            }
        }

        prop_assert_eq!(registry.len(), expected.len());
        for ((record, (path, marker)), index) in registry.iter().zip(&expected).zip(0..) {
            prop_assert_eq!(record.path(), Some(path.as_path()));
            prop_assert_eq!(record.buffer(), marker.to_le_bytes());
            prop_assert_eq!(registry.position(path), Some(index));
        }
    }

    /// Replacing a record never moves it or changes the registry size
    #[test]
    fn prop_replace_preserves_order(count in 1usize..10, target in 0usize..10) {
        let target = target % count;
        let mut registry = FileRegistry::new();
        for i in 0..count {
            registry.insert(record(&PathBuf::from(format!("/staged/{i}")), i));
        }
        let before: Vec<PathBuf> = registry.paths().map(Path::to_path_buf).collect();

        let path = PathBuf::from(format!("/staged/{target}"));
        registry.replace_at(&path, record(&path, 1000)).unwrap();

        let after: Vec<PathBuf> = registry.paths().map(Path::to_path_buf).collect();
        prop_assert_eq!(before, after);
        prop_assert_eq!(
            registry.find_by_path(&path).unwrap().buffer(),
            1000usize.to_le_bytes()
        );
    }
}
