//! Core data types for clonedir
//!
//! This module provides the value types shared by the mirror engine, the
//! configuration layer and the CLI: entry kinds, content fingerprints,
//! per-destination statistics and the destination error policy.

use std::fmt;
use std::time::Duration;

/// File size in bytes
pub type FileSize = u64;

/// Kind of a filesystem entry tracked by the mirror
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntryKind {
    /// A directory
    Directory,
    /// A regular file
    File,
}

impl EntryKind {
    /// Whether this entry is a directory
    pub fn is_dir(self) -> bool {
        matches!(self, Self::Directory)
    }
}

/// Comparable summary of a filesystem entry.
///
/// Directories all share one sentinel value regardless of their contents and
/// can never compare equal to a file. Files are summarised by their length and
/// the sum of all of their bytes.
///
/// The byte sum is a weak checksum: two different contents with the same
/// length and the same sum (for example `[1, 3]` and `[2, 2]`) fingerprint
/// identically and the mirror treats them as unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Fingerprint {
    /// Sentinel shared by every directory
    Directory,
    /// Length and byte sum of a regular file
    File {
        /// Number of bytes in the file
        len: FileSize,
        /// Sum of every byte value.
        ///
        /// At most `u64::MAX` bytes of at most 255 each stay below `2^72`,
        /// so a `u128` accumulator cannot overflow.
        byte_sum: u128,
    },
}

impl Fingerprint {
    /// Fingerprint an in-memory file content
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let byte_sum = bytes.iter().map(|&b| u128::from(b)).sum();
        Self::File {
            len: bytes.len() as FileSize,
            byte_sum,
        }
    }

    /// The entry kind this fingerprint describes
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Directory => EntryKind::Directory,
            Self::File { .. } => EntryKind::File,
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory => write!(f, "dir"),
            Self::File { len, byte_sum } => write!(f, "({len}, {byte_sum})"),
        }
    }
}

/// What to do when one destination fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ErrorPolicy {
    /// Stop the whole run at the first failing destination
    #[default]
    Abort,
    /// Record the failure and move on to the next destination
    Continue,
}

/// Statistics for mirroring one destination
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MirrorStats {
    /// Number of directories created (or recreated)
    pub directories_created: u64,
    /// Number of files written
    pub files_copied: u64,
    /// Total bytes written
    pub bytes_copied: u64,
    /// Number of entries whose fingerprint already matched
    pub entries_skipped: u64,
    /// Number of files removed from the destination
    pub files_deleted: u64,
    /// Number of directories removed from the destination
    pub directories_deleted: u64,
    /// Time spent on this destination
    pub duration: Duration,
}

impl MirrorStats {
    /// Create a new empty statistics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of copy and delete actions performed
    pub fn actions(&self) -> u64 {
        self.directories_created
            + self.files_copied
            + self.files_deleted
            + self.directories_deleted
    }

    /// Whether the destination was already in sync
    pub fn is_unchanged(&self) -> bool {
        self.actions() == 0
    }

    /// Calculate the overall transfer rate in bytes per second
    pub fn transfer_rate(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.bytes_copied as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Merge statistics from another instance
    pub fn merge(&mut self, other: &MirrorStats) {
        self.directories_created += other.directories_created;
        self.files_copied += other.files_copied;
        self.bytes_copied += other.bytes_copied;
        self.entries_skipped += other.entries_skipped;
        self.files_deleted += other.files_deleted;
        self.directories_deleted += other.directories_deleted;
        self.duration += other.duration;
    }
}
