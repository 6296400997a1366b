// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Forced cleanup of previous installs.
//!
//! Removes the dotfiles directory along with the files and links that a
//! previous setup run placed into the home directory. Paths that do not exist
//! are skipped, so cleaning twice is the same as cleaning once.

use crate::config::Paths;

use std::{
    fs::{remove_dir_all, remove_file, symlink_metadata},
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument};

/// Paths removed by cleanup.
pub fn targets(paths: &Paths) -> Vec<PathBuf> {
    vec![
        paths.dotfiles.clone(),
        paths.ruby.rbenv_system.clone(),
        paths.z.z_system.clone(),
        paths.zsh.zshrc_system.clone(),
    ]
}

/// Remove every cleanup target.
///
/// # Errors
///
/// - Return [`CleanError::Remove`] if an existing path cannot be removed.
#[instrument(skip(targets), level = "debug")]
pub fn remove_all(targets: impl IntoIterator<Item = impl AsRef<Path>>) -> Result<()> {
    for target in targets {
        remove(target.as_ref())?;
    }

    Ok(())
}

/// Remove single path regardless of what it is.
///
/// Directories are removed recursively. Symlinks are unlinked, never
/// followed.
///
/// # Errors
///
/// - Return [`CleanError::Remove`] if an existing path cannot be removed.
pub fn remove(path: &Path) -> Result<()> {
    let metadata = match symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("skip missing {:?}", path.display());
            return Ok(());
        }
        Err(err) => {
            return Err(CleanError::Remove {
                source: err,
                path: path.to_path_buf(),
            })
        }
    };

    info!("remove {:?}", path.display());
    let result = if metadata.is_dir() {
        remove_dir_all(path)
    } else {
        remove_file(path)
    };

    match result {
        Err(err) if err.kind() != ErrorKind::NotFound => Err(CleanError::Remove {
            source: err,
            path: path.to_path_buf(),
        }),
        _ => Ok(()),
    }
}

/// Cleanup error types.
#[derive(Debug, thiserror::Error)]
pub enum CleanError {
    /// Existing path cannot be removed.
    #[error("failed to remove {:?}", path.display())]
    Remove {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = CleanError> = std::result::Result<T, E>;
