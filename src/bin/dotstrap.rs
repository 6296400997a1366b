// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use dotstrap::{
    clone::Git2Cloner,
    config::{osx_choices, Paths, Profile, DEFAULT_SHELL},
    path::home_dir,
    prompt::{DefaultsPrompter, InquirePrompter, Prompter, Terminal},
    shell::ShellRunner,
    Task,
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::{io::stdout, path::PathBuf, process::exit};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "\n  dotstrap [options] setup\n  dotstrap [options] run <task>...",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    #[command(flatten)]
    pub options: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    fn run(self) -> Result<()> {
        match self.command {
            Command::Setup => run_tasks(&self.options, &Task::SETUP),
            Command::Run(opts) => run_tasks(&self.options, &opts.tasks),
            Command::Tasks => {
                run_list();
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Run full setup: banner, prompt, clean, template, gitclone, shell, symlink.
    #[command(override_usage = "dotstrap setup [options]")]
    Setup,

    /// Run selected tasks in the given order.
    #[command(override_usage = "dotstrap run [options] <task>...")]
    Run(RunOptions),

    /// List available tasks.
    #[command(override_usage = "dotstrap tasks")]
    Tasks,
}

#[derive(Parser, Clone, Debug)]
struct GlobalOptions {
    /// Path to profile with settings and preset answers.
    #[arg(short, long, global = true, value_name = "path")]
    pub profile: Option<PathBuf>,

    /// Home directory to set up instead of the current user's.
    #[arg(long, global = true, value_name = "path")]
    pub home: Option<PathBuf>,

    /// Accept every prompt default without asking.
    #[arg(short, long, global = true)]
    pub defaults: bool,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct RunOptions {
    /// Tasks to run.
    #[arg(required = true, value_enum, value_name = "task")]
    pub tasks: Vec<Task>,
}

fn main() {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .without_time();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = run() {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

fn run() -> Result<()> {
    Cli::parse().run()
}

fn run_tasks(opts: &GlobalOptions, tasks: &[Task]) -> Result<()> {
    let profile = match &opts.profile {
        Some(path) => Profile::load(path)?,
        None => Profile::default(),
    };

    let home = match opts.home.clone().or(profile.settings.home) {
        Some(home) => home,
        None => home_dir()?,
    };
    let shell = profile
        .settings
        .shell
        .unwrap_or_else(|| DEFAULT_SHELL.into());
    info!("set up {:?} using {shell}", home.display());

    let interactive = Terminal::detect().interactive(opts.defaults);
    let prompter: Box<dyn Prompter> = if interactive {
        Box::new(InquirePrompter)
    } else {
        Box::new(DefaultsPrompter)
    };

    let mut pipeline = dotstrap::Pipeline::new(
        Paths::new(home),
        osx_choices()?,
        prompter,
        Git2Cloner::new(interactive),
        ShellRunner::new(shell),
        stdout(),
    );
    if let Some(answers) = profile.answers {
        pipeline = pipeline.with_answers(answers);
    }
    pipeline.run(tasks)?;

    Ok(())
}

fn run_list() {
    for task in Task::SETUP {
        println!("{:<10} {}", task.name(), task.description());
    }
}
