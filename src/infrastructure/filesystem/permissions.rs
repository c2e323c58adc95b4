//! Write-protection of mirrored repository trees.
//!
//! A mirrored repository rests [`SealState::Sealed`]. Anything that needs to
//! write into it goes through a [`SealGuard`], which unseals the tree and
//! reseals it on every exit path: explicitly through [`SealGuard::seal`]
//! when the caller needs to know whether resealing worked, or best-effort
//! when the guard is dropped.

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::domain::value_objects::SealState;

/// Permission change errors
#[derive(Debug, Error)]
pub enum PermissionError {
    #[error("failed to walk {}: {source}", path.display())]
    WalkFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to change mode of {}: {source}", path.display())]
    SetModeFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PermissionError {
    pub fn path(&self) -> &Path {
        match self {
            Self::WalkFailed { path, .. } | Self::SetModeFailed { path, .. } => path,
        }
    }
}

/// Apply `state` to `root` and everything below it.
///
/// Symbolic links are left alone: changing their mode would change the
/// mode of whatever they point at, which may live outside the tree.
pub fn apply_seal_state(root: &Path, state: SealState) -> Result<(), PermissionError> {
    debug!("marking {} {}", root.display(), state);

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|source| PermissionError::WalkFailed {
            path: root.to_path_buf(),
            source,
        })?;

        if entry.file_type().is_symlink() {
            continue;
        }

        set_mode(&entry, state)?;
    }

    Ok(())
}

#[cfg(unix)]
fn set_mode(entry: &DirEntry, state: SealState) -> Result<(), PermissionError> {
    let path = entry.path();
    let mode = if entry.file_type().is_dir() {
        state.directory_mode()
    } else {
        let metadata = entry.metadata().map_err(|source| PermissionError::WalkFailed {
            path: path.to_path_buf(),
            source,
        })?;
        state.file_mode(metadata.permissions().mode() & 0o100 != 0)
    };

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).map_err(|source| {
        PermissionError::SetModeFailed {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn set_mode(entry: &DirEntry, state: SealState) -> Result<(), PermissionError> {
    // directories have no usable read-only flag outside unix
    if entry.file_type().is_dir() {
        return Ok(());
    }

    let path = entry.path();
    let to_error = |source| PermissionError::SetModeFailed {
        path: path.to_path_buf(),
        source,
    };
    let mut permissions = std::fs::metadata(path).map_err(to_error)?.permissions();
    permissions.set_readonly(state.is_sealed());
    std::fs::set_permissions(path, permissions).map_err(to_error)
}

/// Make a repository tree read-only
pub fn seal_tree(root: &Path) -> Result<(), PermissionError> {
    apply_seal_state(root, SealState::Sealed)
}

/// Make a repository tree writable
pub fn unseal_tree(root: &Path) -> Result<(), PermissionError> {
    apply_seal_state(root, SealState::Unsealed)
}

/// Report the state a tree is in: `Sealed` only if no entry is writable
pub fn inspect_seal_state(root: &Path) -> Result<SealState, PermissionError> {
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|source| PermissionError::WalkFailed {
            path: root.to_path_buf(),
            source,
        })?;

        if entry.file_type().is_symlink() {
            continue;
        }

        let metadata = entry.metadata().map_err(|source| PermissionError::WalkFailed {
            path: entry.path().to_path_buf(),
            source,
        })?;

        if !metadata.permissions().readonly() {
            return Ok(SealState::Unsealed);
        }
    }

    Ok(SealState::Sealed)
}

/// Scoped write access to one repository tree.
#[derive(Debug)]
pub struct SealGuard {
    path: PathBuf,
    resealed: bool,
}

impl SealGuard {
    /// Unseal `path`. If that only half works, the tree is resealed before
    /// the error is returned.
    pub fn unseal(path: impl Into<PathBuf>) -> Result<Self, PermissionError> {
        let path = path.into();

        if let Err(e) = unseal_tree(&path) {
            if let Err(reseal_error) = seal_tree(&path) {
                warn!(
                    "could not reseal {} after a failed unseal: {}",
                    path.display(),
                    reseal_error
                );
            }
            return Err(e);
        }

        Ok(Self {
            path,
            resealed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reseal the tree and report whether that worked
    pub fn seal(mut self) -> Result<(), PermissionError> {
        self.resealed = true;
        seal_tree(&self.path)
    }
}

impl Drop for SealGuard {
    fn drop(&mut self) {
        if self.resealed {
            return;
        }

        if let Err(e) = seal_tree(&self.path) {
            warn!("failed to restore read-only permissions for {}: {}", self.path.display(), e);
        }
    }
}
