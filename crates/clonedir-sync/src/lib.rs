//! Fingerprint-based directory mirroring for clonedir
//!
//! This crate makes one or more destination directories match a source tree:
//!
//! - **Fingerprinting**: Directories share a sentinel, files are summarised by
//!   length and byte sum
//! - **Source inventory**: Every entry under the source root, walked once per run
//! - **Reconciliation**: A copy pass (ancestors first) followed by a deletion
//!   pass (deepest first) for each destination
//! - **Progress reporting**: Events for checksum progress and every action
//!
//! Everything runs on the calling thread, one entry at a time.
//!
//! # Examples
//!
//! ```rust,no_run
//! use clonedir_sync::{MirrorEngine, MirrorOptions, MirrorRequest, NoopObserver};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = MirrorEngine::with_options(MirrorOptions::default());
//! let request = MirrorRequest::new("source_dir", ["backup_a", "backup_b"]);
//! let report = engine.run(&request, &mut NoopObserver)?;
//! println!("Copied {} files", report.total_stats().files_copied);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod engine;
pub mod fingerprint;
pub mod inventory;
pub mod progress;
pub mod reconcile;

pub use engine::{
    DestinationReport, MirrorEngine, MirrorOptions, MirrorReport, MirrorRequest, RunId,
};
pub use fingerprint::fingerprint;
pub use inventory::{Inventory, InventoryEntry};
pub use progress::{MirrorAction, MirrorObserver, NoopObserver};
pub use reconcile::Reconciler;
