// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use crate::RepoFixture;

use dotstrap::{
    clone::{CloneStatus, Cloner, Git2Cloner, Repo},
    config::{osx_choices, Answers, OsxChoice, Paths},
    prompt::{self, DefaultsPrompter, Prompter, Question},
    shell::ShellRunner,
    Pipeline, PipelineError, SetupError, Task,
};

use anyhow::Result;
use git2::Repository;
use indoc::formatdoc;
use pretty_assertions::assert_eq;
use sealed_test::prelude::*;
use std::{
    collections::VecDeque,
    env::current_dir,
    fs::{read_dir, read_to_string, write},
    io::sink,
    path::Path,
};

/// Cloner that refuses to touch the network.
struct OfflineCloner;

impl Cloner for OfflineCloner {
    fn clone_repo(&self, repo: &Repo) -> dotstrap::clone::Result<CloneStatus> {
        panic!("unexpected clone of {}", repo.url);
    }
}

/// Replays canned replies in order.
struct ScriptedPrompter {
    replies: VecDeque<&'static str>,
    picked: Vec<String>,
}

impl Prompter for ScriptedPrompter {
    fn text(&mut self, _question: &Question) -> prompt::Result<String> {
        Ok(self.replies.pop_front().unwrap_or_default().to_string())
    }

    fn checkbox(&mut self, _message: &str, _choices: &[OsxChoice]) -> prompt::Result<Vec<String>> {
        Ok(self.picked.clone())
    }
}

fn pipeline<P: Prompter>(
    home: &Path,
    prompter: P,
    shell: &str,
) -> Result<Pipeline<P, OfflineCloner, std::io::Sink>> {
    Ok(Pipeline::new(
        Paths::new(home),
        osx_choices()?,
        prompter,
        OfflineCloner,
        ShellRunner::new(shell),
        sink(),
    ))
}

#[sealed_test]
fn render_dotfiles_from_prompt_answers() -> Result<()> {
    let home = current_dir()?;
    let prompter = ScriptedPrompter {
        replies: VecDeque::from([
            "blah",
            "John Doe",
            "john@doe.com",
            "vim",
            "git z",
            "robbyrussell",
        ]),
        picked: vec!["dock_autohide".into()],
    };
    let config =
        pipeline(&home, prompter, "/bin/sh")?.run(&[Task::Prompt, Task::Clean, Task::Template])?;
    let paths = &config.paths;

    let expect = formatdoc! {r#"
        export ZSH={home}/.dotfiles/.oh-my-zsh
        ZSH_THEME='robbyrussell'
        plugins=('git' 'z')

        source $ZSH/oh-my-zsh.sh

        export EDITOR='vim'
        export PATH="{home}/.rbenv/bin:/usr/local/bin:$PATH"

        eval "$(rbenv init -)"
    "#, home = home.display()};
    assert_eq!(read_to_string(&paths.zsh.zshrc)?, expect);

    let gitconfig = read_to_string(&paths.git.gitconfig)?;
    assert!(gitconfig.starts_with("[user]\n\tname = John Doe\n\temail = john@doe.com\n"));
    assert!(gitconfig.contains(&format!(
        "\texcludesfile = {}/.dotfiles/.gitignore_global\n",
        home.display()
    )));
    assert!(paths.git.gitignore.exists());

    // Only the picked choice is enabled, every other choice is disabled.
    let osx = read_to_string(&paths.osx.osx)?;
    assert!(osx.contains("sudo scutil --set ComputerName 'blah'\n"));
    for choice in osx_choices()? {
        let line = format!("defaults write {} {} -bool", choice.domain, choice.key);
        let flag = choice.value == "dock_autohide";
        assert!(osx.contains(&format!("{line} {flag}\n")), "{line} {flag}");
        assert!(!osx.contains(&format!("{line} {}\n", !flag)));
    }

    Ok(())
}

#[sealed_test]
fn empty_replies_render_defaults() -> Result<()> {
    let home = current_dir()?;
    let choices = osx_choices()?;
    let prompter = ScriptedPrompter {
        replies: VecDeque::from(["", "", "", "", "", ""]),
        picked: Answers::defaults(&choices).osx_booleans,
    };
    let config = pipeline(&home, prompter, "/bin/sh")?.run(&[Task::Prompt, Task::Template])?;
    assert_eq!(config.answers, Answers::defaults(&choices));

    let gitconfig = read_to_string(&config.paths.git.gitconfig)?;
    assert!(gitconfig.contains("\tname = Eduardo Lundgren\n"));
    assert!(gitconfig.contains("\temail = eduardo.lundgren@liferay.com\n"));
    assert!(gitconfig.contains("\teditor = subl -w\n"));

    let zshrc = read_to_string(&config.paths.zsh.zshrc)?;
    assert!(zshrc.contains("ZSH_THEME='dracula'\n"));
    assert!(zshrc.contains(
        "plugins=('ant' 'git' 'history-substring-search' 'z' 'zsh-syntax-highlighting')\n"
    ));

    Ok(())
}

#[sealed_test]
fn clean_twice_without_existing_paths() -> Result<()> {
    let home = current_dir()?.join("nowhere");
    let mut pipeline = pipeline(&home, DefaultsPrompter, "/bin/sh")?;
    pipeline.run(&[Task::Clean, Task::Clean])?;
    assert!(!home.exists());

    Ok(())
}

#[sealed_test]
fn clean_removes_previous_templates() -> Result<()> {
    let home = current_dir()?;
    let mut pipeline = pipeline(&home, DefaultsPrompter, "/bin/sh")?;
    let config = pipeline.run(&[Task::Template])?;
    write(&config.paths.z.z_system, "")?;
    assert!(config.paths.dotfiles.exists());

    pipeline.run(&[Task::Clean])?;
    assert!(!config.paths.dotfiles.exists());
    assert!(!config.paths.z.z_system.exists());

    Ok(())
}

#[sealed_test]
fn shell_failure_stops_later_tasks() -> Result<()> {
    let home = current_dir()?;
    let mut pipeline = pipeline(&home, DefaultsPrompter, "/bin/false")?;

    let result = pipeline.run(&[Task::Template, Task::Shell, Task::Symlink, Task::Gitclone]);
    assert!(matches!(
        result,
        Err(PipelineError {
            task: Task::Shell,
            source: SetupError::Shell(_)
        })
    ));

    let paths = Paths::new(&home);
    assert!(paths.zsh.zshrc.exists());
    assert!(paths.zsh.zshrc_system.symlink_metadata().is_err());
    assert!(paths.ruby.rbenv_system.symlink_metadata().is_err());

    Ok(())
}

#[sealed_test]
fn clone_twice_leaves_destination_alone() -> Result<()> {
    let root = current_dir()?;
    let fixture = RepoFixture::new(root.join("rbenv.git"))?;
    fixture.stage_and_commit("README.md", "rbenv")?;
    fixture.stage_and_commit("bin/rbenv", "#!/usr/bin/env bash")?;

    let destination = root.join("home").join(".dotfiles").join(".rbenv");
    let repo = Repo::new("ruby_rbenv", fixture.url(), &destination);
    let cloner = Git2Cloner::new(false);

    assert_eq!(cloner.clone_repo(&repo)?, CloneStatus::Cloned);
    assert_eq!(read_to_string(destination.join("README.md"))?, "rbenv");
    let head = Repository::open(&destination)?.head()?.target();
    let entries = read_dir(&destination)?.count();

    // Second clone is skipped even after upstream moves on.
    fixture.stage_and_commit("CHANGELOG.md", "blah")?;
    assert_eq!(cloner.clone_repo(&repo)?, CloneStatus::Skipped);
    assert_eq!(Repository::open(&destination)?.head()?.target(), head);
    assert_eq!(read_dir(&destination)?.count(), entries);
    assert!(!destination.join("CHANGELOG.md").exists());

    Ok(())
}

#[sealed_test]
fn clone_nested_repository_after_parent() -> Result<()> {
    let root = current_dir()?;
    let rbenv = RepoFixture::new(root.join("rbenv.git"))?;
    rbenv.stage_and_commit("README.md", "rbenv")?;
    let build = RepoFixture::new(root.join("ruby-build.git"))?;
    build.stage_and_commit("README.md", "ruby-build")?;

    let paths = Paths::new(root.join("home"));
    let repos = [
        Repo::new("ruby_rbenv", rbenv.url(), &paths.ruby.rbenv),
        Repo::new("ruby_build", build.url(), &paths.ruby.build),
    ];
    let result = dotstrap::clone::clone_all(&Git2Cloner::new(false), &repos)?;
    assert_eq!(result, vec![CloneStatus::Cloned, CloneStatus::Cloned]);
    assert_eq!(read_to_string(paths.ruby.build.join("README.md"))?, "ruby-build");

    Ok(())
}
