//! Reconciliation of a single destination against the source inventory

use crate::fingerprint::fingerprint;
use crate::inventory::{walk_error, Inventory, InventoryEntry};
use crate::progress::{MirrorAction, MirrorObserver};
use clonedir_types::{EntryKind, Error, MirrorStats, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Makes one destination match an [`Inventory`]
#[derive(Debug)]
pub struct Reconciler<'a> {
    inventory: &'a Inventory,
    dry_run: bool,
}

/// Destination entry scheduled for removal
struct Stale {
    path: PathBuf,
    depth: usize,
    is_dir: bool,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler for `inventory`
    pub fn new(inventory: &'a Inventory) -> Self {
        Self {
            inventory,
            dry_run: false,
        }
    }

    /// Report decisions without touching the destination
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run the copy pass then the deletion pass on `destination`
    pub fn reconcile<P: AsRef<Path>>(
        &self,
        destination: P,
        observer: &mut dyn MirrorObserver,
    ) -> Result<MirrorStats> {
        let mut stats = MirrorStats::new();
        self.reconcile_into(destination, &mut stats, observer)?;
        Ok(stats)
    }

    /// Like [`Reconciler::reconcile`], tallying into `stats` so the work done
    /// before a failure stays visible to the caller
    pub fn reconcile_into<P: AsRef<Path>>(
        &self,
        destination: P,
        stats: &mut MirrorStats,
        observer: &mut dyn MirrorObserver,
    ) -> Result<()> {
        let destination = destination.as_ref();
        let start_time = Instant::now();

        let result = self.run_passes(destination, stats, observer);
        stats.duration = start_time.elapsed();
        result?;

        info!(
            "Reconciled '{}': {} copied, {} skipped, {} deleted",
            destination.display(),
            stats.files_copied + stats.directories_created,
            stats.entries_skipped,
            stats.files_deleted + stats.directories_deleted
        );
        Ok(())
    }

    fn run_passes(
        &self,
        destination: &Path,
        stats: &mut MirrorStats,
        observer: &mut dyn MirrorObserver,
    ) -> Result<()> {
        if !self.dry_run && !destination.exists() {
            fs::create_dir_all(destination).map_err(|e| Error::write(destination, &e))?;
            debug!("Created destination root '{}'", destination.display());
        }

        self.copy_pass(destination, stats, observer)?;
        self.deletion_pass(destination, stats, observer)
    }

    /// Copy every missing or changed source entry, ancestors first
    pub fn copy_pass(
        &self,
        destination: &Path,
        stats: &mut MirrorStats,
        observer: &mut dyn MirrorObserver,
    ) -> Result<()> {
        for entry in self.inventory.copy_order() {
            let source_entry = self.inventory.root().join(&entry.path);
            let dest_entry = destination.join(&entry.path);

            if !needs_copy(entry, &dest_entry)? {
                stats.entries_skipped += 1;
                observer.action(&MirrorAction::Skip {
                    destination: dest_entry,
                });
                continue;
            }

            let action = match entry.kind {
                EntryKind::Directory => {
                    if !self.dry_run {
                        fs::create_dir_all(&dest_entry).map_err(|e| Error::write(&dest_entry, &e))?;
                    }
                    stats.directories_created += 1;
                    MirrorAction::CreateDirectory {
                        source: source_entry,
                        destination: dest_entry,
                    }
                }
                EntryKind::File => {
                    let bytes = self.copy_file(&source_entry, &dest_entry)?;
                    stats.files_copied += 1;
                    stats.bytes_copied += bytes;
                    MirrorAction::CopyFile {
                        source: source_entry,
                        destination: dest_entry,
                        bytes,
                    }
                }
            };

            debug!("{:?}", action);
            observer.action(&action);
        }

        Ok(())
    }

    /// Remove every destination entry whose relative path is not in the
    /// inventory, deepest first
    pub fn deletion_pass(
        &self,
        destination: &Path,
        stats: &mut MirrorStats,
        observer: &mut dyn MirrorObserver,
    ) -> Result<()> {
        if !destination.exists() {
            // Only reachable in a dry run against a missing root.
            return Ok(());
        }

        let mut stale = Vec::new();
        for entry in WalkDir::new(destination).min_depth(1).follow_links(false) {
            let entry = entry.map_err(|e| walk_error(destination, e))?;
            let relative_path = entry.path().strip_prefix(destination).unwrap_or(entry.path());

            if !self.inventory.contains(relative_path) {
                stale.push(Stale {
                    depth: relative_path.components().count(),
                    path: entry.path().to_path_buf(),
                    is_dir: entry.file_type().is_dir(),
                });
            }
        }

        stale.sort_by(|a, b| b.depth.cmp(&a.depth).then_with(|| b.path.cmp(&a.path)));

        for entry in stale {
            let action = if entry.is_dir {
                if !self.dry_run {
                    remove_empty_dir(&entry.path)?;
                }
                stats.directories_deleted += 1;
                MirrorAction::DeleteDirectory { path: entry.path }
            } else {
                if !self.dry_run {
                    fs::remove_file(&entry.path).map_err(|e| Error::write(&entry.path, &e))?;
                }
                stats.files_deleted += 1;
                MirrorAction::DeleteFile { path: entry.path }
            };

            debug!("{:?}", action);
            observer.action(&action);
        }

        Ok(())
    }

    /// Overwrite `destination` with the whole content of `source`
    fn copy_file(&self, source: &Path, destination: &Path) -> Result<u64> {
        let content = fs::read(source).map_err(|e| Error::read(source, &e))?;
        if !self.dry_run {
            fs::write(destination, &content).map_err(|e| Error::write(destination, &e))?;
        }
        Ok(content.len() as u64)
    }
}

/// A copy is skipped only when the destination exists, the source was
/// fingerprinted and both fingerprints agree.
fn needs_copy(entry: &InventoryEntry, dest_entry: &Path) -> Result<bool> {
    let Some(source_fingerprint) = entry.fingerprint else {
        return Ok(true);
    };
    if !dest_entry.exists() {
        return Ok(true);
    }
    Ok(fingerprint(dest_entry)? != source_fingerprint)
}

fn remove_empty_dir(path: &Path) -> Result<()> {
    let mut children = fs::read_dir(path).map_err(|e| Error::read(path, &e))?;
    if children.next().is_some() {
        return Err(Error::NonEmptyDirectory {
            path: path.to_path_buf(),
        });
    }
    fs::remove_dir(path).map_err(|e| Error::write(path, &e))
}
