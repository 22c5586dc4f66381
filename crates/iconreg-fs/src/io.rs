//! Whole-file writes for generated sources and configs
//!
//! Content is staged in a sibling temp file, locked and synced, then
//! persisted over the target. The target's permissions carry over to the
//! new file, and a read-only target is refused rather than replaced:
//! engine sources under version control are read-only until checked out.

use crate::{Error, NormalizedPath, Result};
use fs2::FileExt;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Replace `path` with `content` in one rename.
///
/// # Errors
///
/// [`Error::ReadOnly`] if the target exists and is read-only; nothing is
/// staged in that case.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let target = path.to_native();
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    let existing = fs::metadata(&target).ok().map(|m| m.permissions());
    if existing.as_ref().is_some_and(|p| p.readonly()) {
        return Err(Error::ReadOnly { path: target });
    }

    // dropped (and removed) on any early return below
    let mut staged = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    staged
        .as_file()
        .lock_exclusive()
        .map_err(|_| Error::LockFailed {
            path: target.clone(),
        })?;
    staged
        .write_all(content)
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|e| Error::io(staged.path(), e))?;
    if let Some(permissions) = existing {
        fs::set_permissions(staged.path(), permissions)
            .map_err(|e| Error::io(staged.path(), e))?;
    }

    staged
        .persist(&target)
        .map_err(|e| Error::io(&target, e.error))?;

    tracing::debug!(path = %path, bytes = content.len(), "wrote file atomically");
    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Copy `from` to `to`, creating the destination directory when needed.
///
/// Returns the number of bytes copied.
pub fn copy_file(from: &NormalizedPath, to: &NormalizedPath) -> Result<u64> {
    let target = to.to_native();
    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::copy(from.to_native(), &target).map_err(|e| Error::io(from.to_native(), e))
}
