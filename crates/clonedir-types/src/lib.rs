//! Core type system and error handling for clonedir
//!
//! This crate provides the foundational types shared by every clonedir crate:
//!
//! - **Error handling**: A single error enum with kinds and severity levels
//! - **Fingerprints**: The tagged directory/file summary used to skip copies
//! - **Statistics**: Per-destination mirror counters
//!
//! # Features
//!
//! - `serde`: Enable serialization support
//!
//! # Examples
//!
//! ```rust
//! use clonedir_types::{Fingerprint, MirrorStats, Result};
//!
//! fn example_operation() -> Result<MirrorStats> {
//!     let mut stats = MirrorStats::new();
//!     stats.files_copied = 2;
//!     stats.bytes_copied = 4;
//!     Ok(stats)
//! }
//!
//! assert_eq!(Fingerprint::of_bytes(&[1, 3]), Fingerprint::of_bytes(&[2, 2]));
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod result;
pub mod types;

// Re-export commonly used types
pub use error::{Error, ErrorKind, ErrorSeverity};
pub use result::Result;
pub use types::*;
