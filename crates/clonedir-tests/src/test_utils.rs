//! Unified test utilities for clonedir tests and benchmarks

use clonedir_sync::{MirrorAction, MirrorObserver};
use clonedir_types::{Error, MirrorStats};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Test data generation patterns
#[derive(Debug, Clone, Copy)]
pub enum TestDataPattern {
    /// All zeros
    Zeros,
    /// Deterministic pseudo-random bytes
    Random,
    /// Realistic file pattern with some structure
    Realistic,
}

/// Generate test data with specified pattern
pub fn generate_test_data(size: usize, pattern: TestDataPattern) -> Vec<u8> {
    match pattern {
        TestDataPattern::Zeros => vec![0u8; size],
        TestDataPattern::Random => {
            use std::collections::hash_map::DefaultHasher;
            use std::hash::{Hash, Hasher};

            // Deterministic so benchmark runs are comparable
            let mut data = Vec::with_capacity(size);
            let mut hasher = DefaultHasher::new();

            for i in 0..size {
                i.hash(&mut hasher);
                data.push((hasher.finish() % 256) as u8);
            }
            data
        }
        TestDataPattern::Realistic => (0..size).map(|i| ((i * 7 + 13) % 256) as u8).collect(),
    }
}

/// Write `content` to `root/relative`, creating missing parent directories
pub fn write_file<P: AsRef<Path>>(root: &Path, relative: P, content: &[u8]) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Create the directory `root/relative` and its ancestors
pub fn make_dir<P: AsRef<Path>>(root: &Path, relative: P) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(&path).expect("Failed to create test directory");
    path
}

/// Build a small tree with nested, empty and populated directories
pub fn create_sample_tree(root: &Path) {
    make_dir(root, "empty");
    make_dir(root, "nested/deeper/deepest");
    write_file(root, "readme.txt", b"top level");
    write_file(root, "nested/one.bin", &generate_test_data(4096, TestDataPattern::Random));
    write_file(root, "nested/deeper/two.txt", b"two");
    write_file(root, "nested/deeper/deepest/three.txt", b"three");
    write_file(root, "nested/zero.bin", &[]);
}

/// Build a wide tree of `dirs` directories holding `files_per_dir` files each
pub fn create_wide_tree(root: &Path, dirs: usize, files_per_dir: usize, file_size: usize) {
    for d in 0..dirs {
        for f in 0..files_per_dir {
            let content = generate_test_data(file_size + d + f, TestDataPattern::Realistic);
            write_file(root, format!("dir_{d:03}/file_{f:03}.dat"), &content);
        }
    }
}

/// Snapshot entry: directories carry no content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotEntry {
    /// A directory
    Dir,
    /// A file and its bytes
    File(Vec<u8>),
}

/// Every entry under `root`, keyed by relative path
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, SnapshotEntry> {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .map(|entry| {
            let entry = entry.expect("Failed to walk test directory");
            let snapshot_entry = if entry.file_type().is_dir() {
                SnapshotEntry::Dir
            } else {
                SnapshotEntry::File(fs::read(entry.path()).expect("Failed to read snapshot file"))
            };
            let relative = entry
                .path()
                .strip_prefix(root)
                .expect("walked path outside root")
                .to_path_buf();
            (relative, snapshot_entry)
        })
        .collect()
}

/// Relative paths of every entry under `root`
pub fn path_set(root: &Path) -> Vec<PathBuf> {
    snapshot(root).into_keys().collect()
}

/// Observer that records every event for later assertions
#[derive(Debug, Default)]
pub struct RecordingObserver {
    /// Totals announced by `checksums_started`
    pub checksum_runs: Vec<usize>,
    /// Every `(done, total)` tick
    pub checksum_ticks: Vec<(usize, usize)>,
    /// Destinations in the order they were started
    pub started: Vec<PathBuf>,
    /// Every action, in order
    pub actions: Vec<MirrorAction>,
    /// Destinations with whether they succeeded
    pub finished: Vec<(PathBuf, bool)>,
}

impl RecordingObserver {
    /// Actions that modified a destination
    pub fn changes(&self) -> Vec<&MirrorAction> {
        self.actions.iter().filter(|a| a.is_change()).collect()
    }

    /// Forget everything recorded so far
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl MirrorObserver for RecordingObserver {
    fn checksums_started(&mut self, total: usize) {
        self.checksum_runs.push(total);
    }

    fn checksum_progress(&mut self, done: usize, total: usize) {
        self.checksum_ticks.push((done, total));
    }

    fn destination_started(&mut self, destination: &Path) {
        self.started.push(destination.to_path_buf());
    }

    fn action(&mut self, action: &MirrorAction) {
        self.actions.push(action.clone());
    }

    fn destination_finished(
        &mut self,
        destination: &Path,
        outcome: std::result::Result<&MirrorStats, &Error>,
    ) {
        self.finished
            .push((destination.to_path_buf(), outcome.is_ok()));
    }
}
