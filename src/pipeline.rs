// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Task sequencing.
//!
//! A setup is an ordered list of __tasks__. Tasks run one after another, and
//! the first task that fails stops the whole run. Nothing that already ran is
//! rolled back.
//!
//! The prompt task is special, because it produces the answers every later
//! task depends on. Once the prompt finishes, the answers are frozen into a
//! [`SetupConfig`] that later tasks only ever borrow. Preset answers replace
//! the prompt outright: with them, the prompt task is skipped and never asks
//! anything.

use crate::{
    clean,
    clone::{self, Cloner},
    config::{Answers, OsxChoice, Paths, SetupConfig},
    prompt::{self, Prompter},
    shell::{self, ShellRunner},
    symlink, template,
};

use clap::ValueEnum;
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    io::Write,
};
use tracing::{info, instrument};

/// Static banner shown at the start of a setup.
pub const BANNER: &str = include_str!("../templates/banner.txt");

/// Single unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Task {
    /// Print banner.
    Banner,

    /// Ask for configuration values.
    Prompt,

    /// Remove previous install.
    Clean,

    /// Render dotfile templates.
    Template,

    /// Clone external repositories.
    Gitclone,

    /// Run shell commands.
    Shell,

    /// Create symlinks.
    Symlink,
}

impl Task {
    /// Task list of a full setup.
    pub const SETUP: [Task; 7] = [
        Task::Banner,
        Task::Prompt,
        Task::Clean,
        Task::Template,
        Task::Gitclone,
        Task::Shell,
        Task::Symlink,
    ];

    /// Name of task.
    pub fn name(self) -> &'static str {
        match self {
            Task::Banner => "banner",
            Task::Prompt => "prompt",
            Task::Clean => "clean",
            Task::Template => "template",
            Task::Gitclone => "gitclone",
            Task::Shell => "shell",
            Task::Symlink => "symlink",
        }
    }

    /// One line description of task.
    pub fn description(self) -> &'static str {
        match self {
            Task::Banner => "print the banner",
            Task::Prompt => "ask for computer name, git identity, editor, zsh and osx options",
            Task::Clean => "remove ~/.dotfiles, ~/.rbenv, ~/.z, and ~/.zshrc",
            Task::Template => "render .gitconfig, .gitignore_global, .osx, and .zshrc",
            Task::Gitclone => "clone rbenv, ruby-build, oh-my-zsh, dracula, and a zsh plugin",
            Task::Shell => "apply osx defaults, switch to zsh, install node and ruby gems",
            Task::Symlink => "link rbenv, sublime, zshrc, and the dracula zsh theme",
        }
    }
}

impl Display for Task {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.name())
    }
}

/// Ordered task runner.
///
/// Collaborators that talk to the outside world are injected so that runs
/// can be driven without a terminal or network.
#[derive(Debug)]
pub struct Pipeline<P, C, W>
where
    P: Prompter,
    C: Cloner,
    W: Write,
{
    paths: Paths,
    choices: Vec<OsxChoice>,
    preset: Option<Answers>,
    prompter: P,
    cloner: C,
    shell: ShellRunner,
    out: W,
}

impl<P, C, W> Pipeline<P, C, W>
where
    P: Prompter,
    C: Cloner,
    W: Write,
{
    /// Construct new pipeline.
    pub fn new(
        paths: Paths,
        choices: Vec<OsxChoice>,
        prompter: P,
        cloner: C,
        shell: ShellRunner,
        out: W,
    ) -> Self {
        Self {
            paths,
            choices,
            preset: None,
            prompter,
            cloner,
            shell,
            out,
        }
    }

    /// Use preset answers, skipping every prompt task.
    pub fn with_answers(mut self, answers: Answers) -> Self {
        self.preset = Some(answers);
        self
    }

    /// Run tasks in order, stopping at first failure.
    ///
    /// Returns configuration that the tasks ran with.
    ///
    /// # Errors
    ///
    /// - Return [`PipelineError`] naming the first task that fails.
    #[instrument(skip(self), level = "debug")]
    pub fn run(&mut self, tasks: &[Task]) -> Result<SetupConfig> {
        let mut answers = None;
        let mut config = None;

        for &task in tasks {
            info!("running task {task}");
            let result = match task {
                Task::Banner => self.print_banner(),
                Task::Prompt if self.preset.is_some() => {
                    info!("skip prompt, answers are preset");
                    Ok(())
                }
                Task::Prompt => match prompt::ask(&mut self.prompter, &self.choices) {
                    Ok(asked) => {
                        answers = Some(asked);
                        config = None;
                        Ok(())
                    }
                    Err(err) => Err(err.into()),
                },
                _ => {
                    let config = self.freeze(&mut config, answers.as_ref());
                    run_task(task, config, &self.cloner, &self.shell)
                }
            };

            result.map_err(|source| PipelineError { task, source })?;
        }

        Ok(config.unwrap_or_else(|| self.configure(answers.as_ref())))
    }

    fn print_banner(&mut self) -> Result<(), SetupError> {
        self.out.write_all(BANNER.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    // INVARIANT: Preset answers and prompt answers never meet, either one wins
    // over defaults.
    fn configure(&self, answers: Option<&Answers>) -> SetupConfig {
        let answers = answers
            .or(self.preset.as_ref())
            .cloned()
            .unwrap_or_else(|| Answers::defaults(&self.choices));
        SetupConfig::new(self.paths.clone(), answers, self.choices.clone())
    }

    fn freeze<'a>(
        &self,
        config: &'a mut Option<SetupConfig>,
        answers: Option<&Answers>,
    ) -> &'a SetupConfig {
        config.get_or_insert_with(|| self.configure(answers))
    }
}

fn run_task(
    task: Task,
    config: &SetupConfig,
    cloner: &impl Cloner,
    runner: &ShellRunner,
) -> Result<(), SetupError> {
    match task {
        Task::Clean => clean::remove_all(clean::targets(&config.paths))?,
        Task::Template => {
            template::write_all(config)?;
        }
        Task::Gitclone => {
            clone::clone_all(cloner, &clone::repos(&config.paths))?;
        }
        Task::Shell => runner.run_all(&shell::commands(&config.paths))?,
        Task::Symlink => {
            symlink::create_all(&symlink::links(&config.paths))?;
        }
        // INVARIANT: Handled by the pipeline itself.
        Task::Banner | Task::Prompt => {}
    }

    Ok(())
}

/// Failure of a single task.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// Banner cannot be printed.
    #[error("failed to print banner")]
    Banner(#[from] std::io::Error),

    #[error(transparent)]
    Prompt(#[from] prompt::PromptError),

    #[error(transparent)]
    Clean(#[from] clean::CleanError),

    #[error(transparent)]
    Template(#[from] template::TemplateError),

    #[error(transparent)]
    Clone(#[from] clone::CloneError),

    #[error(transparent)]
    Shell(#[from] shell::ShellError),

    #[error(transparent)]
    Symlink(#[from] symlink::SymlinkError),
}

/// Task that stopped the pipeline.
#[derive(Debug, thiserror::Error)]
#[error("task {task} failed")]
pub struct PipelineError {
    pub task: Task,
    #[source]
    pub source: SetupError,
}

/// Friendly result alias :3
pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
