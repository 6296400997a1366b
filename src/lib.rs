// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Bootstrap a shell environment from scratch.
//!
//! Dotstrap sets up a developer machine in one go: it asks a few questions,
//! wipes any previous install, renders git, zsh, and OSX dotfiles, clones
//! rbenv, Oh My Zsh, and friends, runs the shell commands that finish the
//! install, and links everything into place.
//!
//! Every step of the way is a [`Task`]. Tasks run through a [`Pipeline`] in a
//! fixed order, and the first task that fails stops the run.

pub mod clean;
pub mod clone;
pub mod config;
pub mod path;
pub mod pipeline;
pub mod prompt;
pub mod shell;
pub mod symlink;
pub mod template;

pub use config::{Answers, OsxChoice, OsxFlags, Paths, Profile, SetupConfig};
pub use pipeline::{Pipeline, PipelineError, SetupError, Task};
