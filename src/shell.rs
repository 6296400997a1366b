// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Shell command execution.
//!
//! Runs the fixed list of shell commands that finish a setup: apply the
//! generated OSX defaults, prepare z, switch the login shell to zsh, open the
//! Dracula theme files, and install language runtimes and gems. Commands run
//! one after another through a shell binary with inherited stdio. The first
//! command that fails stops the rest.

use crate::config::{Paths, DEFAULT_SHELL};

use std::{
    ffi::OsString,
    process::{Command, ExitStatus},
};
use tracing::{info, instrument};

/// Named shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub name: &'static str,
    pub command: String,
}

impl ShellCommand {
    /// Construct new shell command.
    pub fn new(name: &'static str, command: impl Into<String>) -> Self {
        Self {
            name,
            command: command.into(),
        }
    }
}

/// Every shell command of a setup, in run order.
pub fn commands(paths: &Paths) -> Vec<ShellCommand> {
    let dracula = paths.themes.dracula.display();
    vec![
        ShellCommand::new("osx", format!("source {}", quote(paths.osx.osx.display()))),
        ShellCommand::new("z", format!("touch {}", quote(paths.z.z_system.display()))),
        ShellCommand::new("zsh", "chsh -s /bin/zsh"),
        ShellCommand::new(
            "theme_alfred",
            format!("open {}", quote(format!("{dracula}/alfred/Dracula.alfredappearance"))),
        ),
        ShellCommand::new(
            "theme_iterm",
            format!("open {}", quote(format!("{dracula}/iterm/Dracula.itermcolors"))),
        ),
        ShellCommand::new("node_latest", "sudo n latest"),
        ShellCommand::new("node_stable", "sudo n stable"),
        ShellCommand::new("ruby_compass", "sudo gem install compass"),
        ShellCommand::new("ruby_jekyll", "sudo gem install jekyll"),
        ShellCommand::new("ruby_update", "sudo gem update --system"),
    ]
}

// INVARIANT: Single quote argument so nothing inside it is expanded by the shell.
pub(crate) fn quote(arg: impl ToString) -> String {
    format!("'{}'", arg.to_string().replace('\'', r"'\''"))
}

/// Run shell commands through a shell binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellRunner {
    shell: OsString,
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

impl ShellRunner {
    /// Construct new shell runner.
    pub fn new(shell: impl Into<OsString>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// Run single command, blocking until it exits.
    ///
    /// # Errors
    ///
    /// - Return [`ShellError::Spawn`] if shell cannot be spawned.
    /// - Return [`ShellError::Failed`] if command exits unsuccessfully.
    #[instrument(skip(self, command), fields(name = command.name), level = "debug")]
    pub fn run(&self, command: &ShellCommand) -> Result<()> {
        info!("run {:?}", command.command);
        let status = Command::new(&self.shell)
            .arg("-c")
            .arg(&command.command)
            .status()
            .map_err(|err| ShellError::Spawn {
                source: err,
                name: command.name,
            })?;

        if !status.success() {
            return Err(ShellError::Failed {
                name: command.name,
                command: command.command.clone(),
                status,
            });
        }

        Ok(())
    }

    /// Run every command in order, stopping at first failure.
    ///
    /// # Errors
    ///
    /// - Return [`ShellError`] of first command that fails.
    pub fn run_all(&self, commands: &[ShellCommand]) -> Result<()> {
        for command in commands {
            self.run(command)?;
        }

        Ok(())
    }
}

/// Shell error types.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// Shell binary cannot be spawned.
    #[error("failed to spawn shell for {name}")]
    Spawn {
        #[source]
        source: std::io::Error,
        name: &'static str,
    },

    /// Command exits unsuccessfully.
    #[error("shell command {name} ({command:?}) failed with {status}")]
    Failed {
        name: &'static str,
        command: String,
        status: ExitStatus,
    },
}

/// Friendly result alias :3
pub type Result<T, E = ShellError> = std::result::Result<T, E>;
