//! Fingerprinting of filesystem entries

use clonedir_types::{Error, Fingerprint, Result};
use std::fs;
use std::path::Path;

/// Compute the fingerprint of an existing entry.
///
/// Directories map to [`Fingerprint::Directory`]. Anything else is read fully
/// into memory and summarised by length and byte sum, so memory use is bounded
/// by the size of the file.
pub fn fingerprint<P: AsRef<Path>>(path: P) -> Result<Fingerprint> {
    let path = path.as_ref();
    let metadata = fs::metadata(path).map_err(|e| Error::read(path, &e))?;

    if metadata.is_dir() {
        return Ok(Fingerprint::Directory);
    }

    let content = fs::read(path).map_err(|e| Error::read(path, &e))?;
    Ok(Fingerprint::of_bytes(&content))
}
