//! Writing rendered content to disk
//!
//! Content is written to a temporary file next to the destination and renamed
//! into place, so readers see either the previous file or the complete new one.
//! Without `force` the rename refuses to replace an existing file, which makes
//! concurrent non-forced writers to one path yield a single winner.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::{GenerationError, Result};

/// What happened to a destination path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterializeOutcome {
    /// The content was written
    Written(PathBuf),
    /// The path already existed and `force` was not set; nothing was written
    Conflict(PathBuf),
}

impl MaterializeOutcome {
    /// Path the outcome refers to
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Written(path) | Self::Conflict(path) => path,
        }
    }

    /// Whether the content landed on disk
    #[must_use]
    pub const fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }
}

/// Write `content` to `path` under the existence/overwrite policy
///
/// Missing parent directories are created; creation is idempotent.
///
/// # Errors
///
/// Returns [`GenerationError::Io`] if a directory cannot be created or the
/// content cannot be written or moved into place. The destination is left
/// untouched in that case.
pub fn materialize(path: &Path, content: &str, force: bool) -> Result<MaterializeOutcome> {
    if !force && path.exists() {
        tracing::debug!(path = %path.display(), "destination exists, not overwriting");
        return Ok(MaterializeOutcome::Conflict(path.to_path_buf()));
    }

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| GenerationError::io(parent, e))?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| GenerationError::io(parent, e))?;
    temp.write_all(content.as_bytes())
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| GenerationError::io(temp.path(), e))?;

    let persisted = if force {
        temp.persist(path)
    } else {
        temp.persist_noclobber(path)
    };

    match persisted {
        Ok(_) => {
            tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");
            Ok(MaterializeOutcome::Written(path.to_path_buf()))
        }
        Err(err) if !force && err.error.kind() == ErrorKind::AlreadyExists => {
            tracing::debug!(path = %path.display(), "destination appeared concurrently");
            Ok(MaterializeOutcome::Conflict(path.to_path_buf()))
        }
        Err(err) => Err(GenerationError::io(path, err.error)),
    }
}
