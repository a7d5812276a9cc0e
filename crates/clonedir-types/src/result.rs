//! Result type alias for clonedir operations

use crate::Error;

/// Result type alias for clonedir operations
pub type Result<T> = std::result::Result<T, Error>;
