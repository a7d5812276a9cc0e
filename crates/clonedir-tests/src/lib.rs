//! Integration test support for clonedir
//!
//! Shared fixtures for the workspace integration tests and benchmarks.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Unified test utilities
///
/// Tree builders, tree snapshots and a recording observer used across the
/// integration tests and benchmarks.
pub mod test_utils;
