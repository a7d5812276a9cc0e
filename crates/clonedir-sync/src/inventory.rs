//! Source inventory: every entry under the source root, keyed by relative path

use crate::fingerprint::fingerprint;
use crate::progress::MirrorObserver;
use clonedir_types::{EntryKind, Error, Fingerprint, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// One recorded source entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    /// Path relative to the source root
    pub path: PathBuf,
    /// Directory or regular file
    pub kind: EntryKind,
    /// Fingerprint, when checksums are enabled
    pub fingerprint: Option<Fingerprint>,
}

impl InventoryEntry {
    /// Number of path components, used for ancestor-first ordering
    pub fn depth(&self) -> usize {
        self.path.components().count()
    }
}

/// Complete record of the source tree for one run.
///
/// Keys are unique relative paths. The key set is fixed once [`Inventory::build`]
/// returns.
#[derive(Debug, Clone)]
pub struct Inventory {
    root: PathBuf,
    entries: Vec<InventoryEntry>,
    index: HashMap<PathBuf, usize>,
}

impl Inventory {
    /// Walk `root` and record every file and directory below it.
    ///
    /// With `compute_fingerprints` set, each entry is fingerprinted once and
    /// progress is reported to `observer`.
    pub fn build<P: AsRef<Path>>(
        root: P,
        compute_fingerprints: bool,
        observer: &mut dyn MirrorObserver,
    ) -> Result<Self> {
        let root = root.as_ref();
        let mut inventory = Self {
            root: root.to_path_buf(),
            entries: Vec::new(),
            index: HashMap::new(),
        };

        for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
            let entry = entry.map_err(|e| walk_error(root, e))?;
            let file_type = entry.file_type();

            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                debug!("Skipping non-regular entry: {}", entry.path().display());
                continue;
            };

            let relative_path = entry.path().strip_prefix(root).unwrap_or(entry.path());
            inventory.insert(relative_path.to_path_buf(), kind);
        }

        info!(
            "Inventoried {} entries in '{}'",
            inventory.len(),
            root.display()
        );

        if compute_fingerprints {
            inventory.compute_fingerprints(observer)?;
        }

        Ok(inventory)
    }

    fn insert(&mut self, path: PathBuf, kind: EntryKind) {
        if self.index.contains_key(&path) {
            return;
        }
        self.index.insert(path.clone(), self.entries.len());
        self.entries.push(InventoryEntry {
            path,
            kind,
            fingerprint: None,
        });
    }

    fn compute_fingerprints(&mut self, observer: &mut dyn MirrorObserver) -> Result<()> {
        let total = self.entries.len();
        observer.checksums_started(total);

        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.fingerprint = Some(fingerprint(self.root.join(&entry.path))?);
            observer.checksum_progress(i + 1, total);
        }

        observer.checksums_finished();
        debug!("Fingerprinted {} entries", total);
        Ok(())
    }

    /// Source root the inventory was built from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the source tree had no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `relative_path` is a source entry
    pub fn contains<P: AsRef<Path>>(&self, relative_path: P) -> bool {
        self.index.contains_key(relative_path.as_ref())
    }

    /// Look up a source entry by relative path
    pub fn get<P: AsRef<Path>>(&self, relative_path: P) -> Option<&InventoryEntry> {
        self.index
            .get(relative_path.as_ref())
            .map(|&i| &self.entries[i])
    }

    /// Entries in walk order
    pub fn iter(&self) -> impl Iterator<Item = &InventoryEntry> {
        self.entries.iter()
    }

    /// Entries ordered so every directory precedes everything nested in it.
    ///
    /// Sorted by depth first, then by path, independent of walk order.
    pub fn copy_order(&self) -> Vec<&InventoryEntry> {
        let mut ordered: Vec<&InventoryEntry> = self.entries.iter().collect();
        ordered.sort_by(|a, b| a.depth().cmp(&b.depth()).then_with(|| a.path.cmp(&b.path)));
        ordered
    }
}

/// Map a directory walk failure to a read error on the offending path
pub(crate) fn walk_error(root: &Path, error: walkdir::Error) -> Error {
    let path = error.path().unwrap_or(root).to_path_buf();
    match error.into_io_error() {
        Some(io_error) => Error::read(path, &io_error),
        None => Error::Read {
            path,
            message: "filesystem loop detected".to_string(),
        },
    }
}
