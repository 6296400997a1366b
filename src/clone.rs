// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Repository cloning.
//!
//! Dotstrap pulls in a handful of external repositories: rbenv and its
//! ruby-build plugin, Oh My Zsh, the zsh-syntax-highlighting plugin, and the
//! Dracula theme. Each repository has a fixed destination. If anything already
//! sits at that destination the clone is skipped. Existing clones are never
//! fetched or pulled.

use crate::config::Paths;

use auth_git2::{GitAuthenticator, Prompter};
use git2::{build::RepoBuilder, Config, FetchOptions, RemoteCallbacks};
use indicatif::{ProgressBar, ProgressStyle};
use inquire::{Password, Text};
use std::{
    path::{Path, PathBuf},
    time,
};
use tracing::{info, instrument, warn};

/// Repository to clone, and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repo {
    pub name: &'static str,
    pub url: String,
    pub destination: PathBuf,
}

impl Repo {
    /// Construct new repository entry.
    pub fn new(
        name: &'static str,
        url: impl Into<String>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name,
            url: url.into(),
            destination: destination.into(),
        }
    }
}

/// Every repository dotstrap clones, in clone order.
///
/// Ruby-build lives inside the rbenv clone, so rbenv must come first.
pub fn repos(paths: &Paths) -> Vec<Repo> {
    vec![
        Repo::new(
            "ruby_rbenv",
            "https://github.com/sstephenson/rbenv.git",
            &paths.ruby.rbenv,
        ),
        Repo::new(
            "ruby_build",
            "https://github.com/sstephenson/ruby-build.git",
            &paths.ruby.build,
        ),
        Repo::new(
            "oh_my_zsh",
            "https://github.com/robbyrussell/oh-my-zsh.git",
            &paths.zsh.oh_my_zsh,
        ),
        Repo::new(
            "theme_dracula",
            "https://github.com/zenorocha/dracula-theme.git",
            &paths.themes.dracula,
        ),
        Repo::new(
            "zsh_syntax_highlighting",
            "https://github.com/zsh-users/zsh-syntax-highlighting.git",
            &paths.zsh.plugin_syntax,
        ),
    ]
}

/// Outcome of a clone request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneStatus {
    /// Repository was cloned.
    Cloned,

    /// Destination already existed, nothing was done.
    Skipped,
}

/// Layer of indirection for cloning.
pub trait Cloner {
    /// Clone repository into its destination unless the destination exists.
    fn clone_repo(&self, repo: &Repo) -> Result<CloneStatus>;
}

impl<C: Cloner> Cloner for &C {
    fn clone_repo(&self, repo: &Repo) -> Result<CloneStatus> {
        (**self).clone_repo(repo)
    }
}

/// Clone every repository in order.
///
/// # Errors
///
/// - Return [`CloneError`] of first repository that fails to clone.
#[instrument(skip(cloner, repos), level = "debug")]
pub fn clone_all(cloner: &impl Cloner, repos: &[Repo]) -> Result<Vec<CloneStatus>> {
    repos.iter().map(|repo| cloner.clone_repo(repo)).collect()
}

/// Cloning through libgit2.
#[derive(Debug, Default)]
pub struct Git2Cloner {
    progress: bool,
}

impl Git2Cloner {
    /// Construct new cloner.
    ///
    /// Progress bars are only drawn when `progress` is set.
    pub fn new(progress: bool) -> Self {
        Self { progress }
    }
}

impl Cloner for Git2Cloner {
    /// Clone repository through libgit2.
    ///
    /// The progress of the clone is displayed through a progress bar. If any
    /// credentials are required for the clone to continue, then the user will
    /// be prompted for that information accordingly. The progress bar will be
    /// blocked for user input.
    ///
    /// # Errors
    ///
    /// - Return [`CloneError::Git2`] if libgit2 operations fail.
    /// - Return [`CloneError::Parent`] if parent directory cannot be made.
    #[instrument(skip(self, repo), fields(name = repo.name), level = "debug")]
    fn clone_repo(&self, repo: &Repo) -> Result<CloneStatus> {
        if repo.destination.symlink_metadata().is_ok() {
            warn!(
                "skip {}, {:?} already exists",
                repo.name,
                repo.destination.display()
            );
            return Ok(CloneStatus::Skipped);
        }

        info!("clone {} into {:?}", repo.url, repo.destination.display());
        if let Some(parent) = repo.destination.parent() {
            mkdirp::mkdirp(parent).map_err(|err| CloneError::Parent {
                source: err,
                path: parent.to_path_buf(),
            })?;
        }

        let bar = if self.progress {
            ProgressBar::no_length()
        } else {
            ProgressBar::hidden()
        };
        let style = ProgressStyle::with_template(
            "{elapsed_precise:.green}  {msg:<50}  [{wide_bar:.yellow/blue}]",
        )?
        .progress_chars("-Cco.");
        bar.set_style(style);
        bar.set_message(repo.name);
        bar.enable_steady_tick(time::Duration::from_millis(100));

        let prompter = IndicatifPrompter::new(repo.name, bar);
        let authenticator = GitAuthenticator::default().set_prompter(prompter.clone());
        let config = Config::open_default()?;

        let mut throttle = time::Instant::now();
        let mut rc = RemoteCallbacks::new();
        rc.credentials(authenticator.credentials(&config));
        rc.transfer_progress(|progress| {
            let stats = progress.to_owned();
            let bar_size = stats.total_objects() as u64;
            let bar_pos = stats.received_objects() as u64;
            if throttle.elapsed() > time::Duration::from_millis(10) {
                throttle = time::Instant::now();
                prompter.bar.set_length(bar_size);
                prompter.bar.set_position(bar_pos);
            }
            true
        });

        let mut fo = FetchOptions::new();
        fo.remote_callbacks(rc);
        let result = RepoBuilder::new()
            .fetch_options(fo)
            .clone(repo.url.as_str(), repo.destination.as_path());
        prompter.bar.finish_and_clear();
        result?;

        Ok(CloneStatus::Cloned)
    }
}

/// Credential prompter that pauses the progress bar of a clone.
///
/// Every question names the repository being cloned, since several clones
/// may ask for credentials during a single setup.
#[derive(Debug, Clone)]
pub struct IndicatifPrompter {
    repo: &'static str,
    pub(crate) bar: ProgressBar,
}

impl IndicatifPrompter {
    /// Construct new credential prompter for repository.
    pub fn new(repo: &'static str, bar: ProgressBar) -> Self {
        Self { repo, bar }
    }

    fn label(&self, field: &str) -> String {
        format!("{field} for {}", self.repo)
    }

    fn ask_secret(&self, field: &str) -> Option<String> {
        let label = self.label(field);
        self.bar
            .suspend(|| Password::new(&label).without_confirmation().prompt().ok())
    }
}

impl Prompter for IndicatifPrompter {
    #[instrument(skip(self, url, _config), fields(repo = self.repo), level = "debug")]
    fn prompt_username_password(
        &mut self,
        url: &str,
        _config: &git2::Config,
    ) -> Option<(String, String)> {
        info!("{} needs credentials for {url}", self.repo);
        let label = self.label("username");
        let username = self.bar.suspend(|| Text::new(&label).prompt().ok())?;
        let password = self.ask_secret("password")?;
        Some((username, password))
    }

    #[instrument(skip(self, username, url, _config), fields(repo = self.repo), level = "debug")]
    fn prompt_password(
        &mut self,
        username: &str,
        url: &str,
        _config: &git2::Config,
    ) -> Option<String> {
        info!("{} needs password of {username} for {url}", self.repo);
        self.ask_secret("password")
    }

    #[instrument(skip(self, ssh_key_path, _config), fields(repo = self.repo), level = "debug")]
    fn prompt_ssh_key_passphrase(
        &mut self,
        ssh_key_path: &Path,
        _config: &git2::Config,
    ) -> Option<String> {
        info!(
            "{} needs passphrase of ssh key {:?}",
            self.repo,
            ssh_key_path.display()
        );
        self.ask_secret("passphrase")
    }
}

/// Clone error types.
#[derive(Debug, thiserror::Error)]
pub enum CloneError {
    /// Parent directory of destination cannot be created.
    #[error("failed to create parent directory {:?}", path.display())]
    Parent {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Style template cannot be set for progress bars.
    #[error(transparent)]
    IndicatifStyleTemplate(#[from] indicatif::style::TemplateError),

    /// Operations from libgit2 fail.
    #[error(transparent)]
    Git2(#[from] git2::Error),
}

/// Friendly result alias :3
pub type Result<T, E = CloneError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rbenv_is_cloned_before_its_plugin() {
        let repos = repos(&Paths::new("/home/blah"));
        assert_eq!(repos.len(), 5);

        let rbenv = repos.iter().position(|r| r.name == "ruby_rbenv").unwrap();
        let build = repos.iter().position(|r| r.name == "ruby_build").unwrap();
        assert!(rbenv < build);
        assert!(repos[build].destination.starts_with(&repos[rbenv].destination));
    }

    #[test]
    fn credential_prompts_name_repository() {
        let prompter = IndicatifPrompter::new("oh_my_zsh", ProgressBar::hidden());
        assert_eq!(prompter.label("username"), "username for oh_my_zsh");
        assert_eq!(prompter.label("passphrase"), "passphrase for oh_my_zsh");
    }
}
