//! Progress reporting for mirror runs
//!
//! The engine never prints anything itself. Checksum progress and every copy
//! or delete decision is handed to a [`MirrorObserver`], and the caller
//! decides how to render it.

use clonedir_types::{Error, MirrorStats};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A single decision taken while reconciling a destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MirrorAction {
    /// A directory was created in the destination
    CreateDirectory {
        /// Source directory
        source: PathBuf,
        /// Destination directory
        destination: PathBuf,
    },
    /// A file was written to the destination
    CopyFile {
        /// Source file
        source: PathBuf,
        /// Destination file
        destination: PathBuf,
        /// Number of bytes written
        bytes: u64,
    },
    /// The destination entry already matched the source fingerprint
    Skip {
        /// Destination entry left untouched
        destination: PathBuf,
    },
    /// A file absent from the source was removed
    DeleteFile {
        /// Removed destination path
        path: PathBuf,
    },
    /// A directory absent from the source was removed
    DeleteDirectory {
        /// Removed destination path
        path: PathBuf,
    },
}

impl MirrorAction {
    /// Whether this action modifies the destination
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Skip { .. })
    }

    /// Whether this action removes an entry
    pub fn is_delete(&self) -> bool {
        matches!(self, Self::DeleteFile { .. } | Self::DeleteDirectory { .. })
    }
}

/// Receiver for mirror progress events.
///
/// Every method has an empty default so observers only implement what they
/// render.
pub trait MirrorObserver {
    /// Fingerprinting of `total` source entries is about to start
    fn checksums_started(&mut self, _total: usize) {}

    /// Entry `done` of `total` has been fingerprinted
    fn checksum_progress(&mut self, _done: usize, _total: usize) {}

    /// All source entries have been fingerprinted
    fn checksums_finished(&mut self) {}

    /// Reconciliation of `destination` is about to start
    fn destination_started(&mut self, _destination: &Path) {}

    /// An action was decided (and applied, unless this is a dry run)
    fn action(&mut self, _action: &MirrorAction) {}

    /// Reconciliation of `destination` ended
    fn destination_finished(
        &mut self,
        _destination: &Path,
        _outcome: std::result::Result<&MirrorStats, &Error>,
    ) {
    }
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl MirrorObserver for NoopObserver {}
