// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Symlink creation.
//!
//! Links generated and cloned files into the places where tools expect them.
//! Every link stores the path of its source relative to the directory that
//! holds the link, so the dotfiles directory can be moved around along with
//! the home directory.
//!
//! # Existing Destinations
//!
//! A link is never forced. If anything, including a dangling link, already
//! sits at the destination, then the link is skipped with a warning.

use crate::{config::Paths, path::relative_path};

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{info, instrument, warn};

/// Path to Sublime Text command line helper inside its app bundle.
pub const SUBLIME_SOURCE: &str = "/Applications/Sublime Text.app/Contents/SharedSupport/bin/subl";

/// Location of Sublime Text command line helper on the user's path.
pub const SUBLIME_DESTINATION: &str = "/usr/local/bin/subl";

/// Symlink to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub name: &'static str,
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl Link {
    /// Construct new symlink entry.
    pub fn new(
        name: &'static str,
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name,
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Source path relative to directory containing destination.
    pub fn relative_source(&self) -> PathBuf {
        match self.destination.parent() {
            Some(parent) => relative_path(parent, &self.source),
            None => self.source.clone(),
        }
    }
}

/// Every symlink of a setup.
pub fn links(paths: &Paths) -> Vec<Link> {
    vec![
        Link::new("ruby", &paths.ruby.rbenv, &paths.ruby.rbenv_system),
        Link::new("sublime", SUBLIME_SOURCE, SUBLIME_DESTINATION),
        Link::new("zsh", &paths.zsh.zshrc, &paths.zsh.zshrc_system),
        Link::new(
            "zsh_theme_dracula",
            paths.themes.dracula.join("zsh").join("dracula.zsh-theme"),
            &paths.zsh.theme_dracula,
        ),
    ]
}

/// Outcome of a link request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// Symlink was created.
    Created,

    /// Destination already existed, nothing was done.
    Skipped,
}

/// Create symlink with relative source.
///
/// Missing parent directories of the destination are created.
///
/// # Errors
///
/// - Return [`SymlinkError::Parent`] if parent directory cannot be made.
/// - Return [`SymlinkError::Create`] if symlink cannot be created.
#[instrument(skip(link), fields(name = link.name), level = "debug")]
pub fn create(link: &Link) -> Result<LinkStatus> {
    match link.destination.symlink_metadata() {
        Ok(_) => {
            warn!(
                "skip {}, {:?} already exists",
                link.name,
                link.destination.display()
            );
            return Ok(LinkStatus::Skipped);
        }
        Err(err) if err.kind() != ErrorKind::NotFound => {
            return Err(SymlinkError::Create {
                source: err,
                destination: link.destination.clone(),
            });
        }
        Err(_) => {}
    }

    if let Some(parent) = link.destination.parent() {
        mkdirp::mkdirp(parent).map_err(|err| SymlinkError::Parent {
            source: err,
            path: parent.to_path_buf(),
        })?;
    }

    let source = link.relative_source();
    info!(
        "link {:?} -> {:?}",
        link.destination.display(),
        source.display()
    );
    symlink(&source, &link.destination).map_err(|err| SymlinkError::Create {
        source: err,
        destination: link.destination.clone(),
    })?;

    Ok(LinkStatus::Created)
}

/// Create every symlink in order.
///
/// # Errors
///
/// - Return [`SymlinkError`] of first link that fails.
pub fn create_all(links: &[Link]) -> Result<Vec<LinkStatus>> {
    links.iter().map(create).collect()
}

#[cfg(unix)]
fn symlink(source: &Path, destination: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(source, destination)
}

#[cfg(windows)]
fn symlink(source: &Path, destination: &Path) -> std::io::Result<()> {
    let absolute = destination
        .parent()
        .map(|parent| parent.join(source))
        .unwrap_or_else(|| source.to_path_buf());
    if absolute.is_dir() {
        std::os::windows::fs::symlink_dir(source, destination)
    } else {
        std::os::windows::fs::symlink_file(source, destination)
    }
}

/// Symlink error types.
#[derive(Debug, thiserror::Error)]
pub enum SymlinkError {
    /// Parent directory of destination cannot be created.
    #[error("failed to create parent directory {:?}", path.display())]
    Parent {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Symlink cannot be created.
    #[error("failed to create symlink at {:?}", destination.display())]
    Create {
        #[source]
        source: std::io::Error,
        destination: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = SymlinkError> = std::result::Result<T, E>;
