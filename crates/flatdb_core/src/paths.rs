//! Key-to-path resolution.
//!
//! This module handles the file system layout for flatdb:
//!
//! ```text
//! <root>/
//! ├─ <collection>/
//! │  ├─ <resource>.json        # committed record
//! │  └─ <resource>.json.tmp    # transient, only while a write is in flight
//! └─ <collection>/...
//! ```
//!
//! Resolution is a pure mapping with no filesystem side effects. Names are
//! validated here so that caller-supplied strings can never escape the
//! store root.

use crate::error::{StoreError, StoreResult};
use std::path::{Path, PathBuf};

/// Extension carried by committed record files.
pub(crate) const RECORD_EXT: &str = "json";

/// Suffix appended to the final path while a write is in flight.
const TEMP_SUFFIX: &str = ".tmp";

/// Resolved on-disk locations for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordPaths {
    /// Where the committed record lives.
    pub final_path: PathBuf,
    /// Sibling path used for the write-then-rename swap.
    pub temp_path: PathBuf,
}

/// Validates a collection or resource name for use as a single path segment.
///
/// Rejects empty names, names containing a path separator, and the `.`/`..`
/// segments. `kind` names the offending input in the error message.
pub(crate) fn validate_name(kind: &str, name: &str) -> StoreResult<()> {
    if name.is_empty() {
        return Err(StoreError::invalid_key(format!("{kind} name is empty")));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(StoreError::invalid_key(format!(
            "{kind} name {name:?} contains a path separator"
        )));
    }
    if name == "." || name == ".." {
        return Err(StoreError::invalid_key(format!(
            "{kind} name {name:?} is a relative path segment"
        )));
    }
    Ok(())
}

/// Maps a `(collection, resource)` key to its final and temporary paths.
///
/// # Errors
///
/// Returns [`StoreError::InvalidKey`] if either name fails validation.
pub(crate) fn record_paths(
    root: &Path,
    collection: &str,
    resource: &str,
) -> StoreResult<RecordPaths> {
    validate_name("collection", collection)?;
    validate_name("resource", resource)?;

    let final_path = root
        .join(collection)
        .join(format!("{resource}.{RECORD_EXT}"));

    let mut temp_path = final_path.clone().into_os_string();
    temp_path.push(TEMP_SUFFIX);

    Ok(RecordPaths {
        final_path,
        temp_path: PathBuf::from(temp_path),
    })
}
