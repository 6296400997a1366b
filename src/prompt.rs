// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Interactive prompt.
//!
//! Ask the fixed question list that fills in [`Answers`]. Each text question
//! carries a literal default that is used whenever the user supplies an empty
//! answer. The final question is a checkbox over the OSX choice list whose
//! default selection is taken from the choice list itself.

use crate::config::{Answers, OsxChoice};

use inquire::{MultiSelect, Text};
use std::io::{stderr, stdin, IsTerminal};
use tracing::{debug, instrument, warn};

/// Question asking for a line of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub message: &'static str,
    pub default: &'static str,
}

/// Text questions in the order they are asked.
///
/// Maps onto computer name, git name, git email, editor, zsh plugins, and
/// zsh theme of [`Answers`].
pub const QUESTIONS: [Question; 6] = [
    Question {
        message: "Which computer name would you like to use?",
        default: "eduardo",
    },
    Question {
        message: "Which Git name would you like to use?",
        default: "Eduardo Lundgren",
    },
    Question {
        message: "Which Git email would you like to use?",
        default: "eduardo.lundgren@liferay.com",
    },
    Question {
        message: "Which editor would you like to use?",
        default: "subl",
    },
    Question {
        message: "Which Oh My Zsh plugins would you like to use?",
        default: "ant git history-substring-search z zsh-syntax-highlighting",
    },
    Question {
        message: "Which Oh My Zsh theme would you like to use?",
        default: "dracula",
    },
];

/// Message of the OSX checkbox question.
pub const OSX_MESSAGE: &str =
    "Which OSX options would you like to use? (press enter to use default values)";

/// Layer of indirection for asking questions.
pub trait Prompter {
    /// Ask for a line of text.
    fn text(&mut self, question: &Question) -> Result<String>;

    /// Ask to pick any number of choices.
    ///
    /// Returns identifiers of picked choices in choice list order.
    fn checkbox(&mut self, message: &str, choices: &[OsxChoice]) -> Result<Vec<String>>;
}

impl<P: Prompter + ?Sized> Prompter for Box<P> {
    fn text(&mut self, question: &Question) -> Result<String> {
        (**self).text(question)
    }

    fn checkbox(&mut self, message: &str, choices: &[OsxChoice]) -> Result<Vec<String>> {
        (**self).checkbox(message, choices)
    }
}

/// Prompter that talks to the terminal through inquire.
#[derive(Debug, Default)]
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn text(&mut self, question: &Question) -> Result<String> {
        Ok(Text::new(question.message)
            .with_default(question.default)
            .prompt()?)
    }

    fn checkbox(&mut self, message: &str, choices: &[OsxChoice]) -> Result<Vec<String>> {
        let defaults = choices
            .iter()
            .enumerate()
            .filter(|(_, choice)| choice.checked)
            .map(|(index, _)| index)
            .collect::<Vec<_>>();

        let picked = MultiSelect::new(message, choices.to_vec())
            .with_default(&defaults)
            .prompt()?;

        Ok(picked.into_iter().map(|choice| choice.value).collect())
    }
}

/// Prompter that accepts every default without asking anything.
#[derive(Debug, Default)]
pub struct DefaultsPrompter;

impl Prompter for DefaultsPrompter {
    fn text(&mut self, question: &Question) -> Result<String> {
        Ok(question.default.to_string())
    }

    fn checkbox(&mut self, _message: &str, choices: &[OsxChoice]) -> Result<Vec<String>> {
        Ok(choices
            .iter()
            .filter(|choice| choice.checked)
            .map(|choice| choice.value.clone())
            .collect())
    }
}

/// Terminal streams a prompt needs.
///
/// Inquire reads keys from stdin and draws on stderr. Stdout plays no part,
/// so it can be piped without losing the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terminal {
    pub stdin: bool,
    pub stderr: bool,
}

impl Terminal {
    /// Inspect streams of current process.
    pub fn detect() -> Self {
        Self {
            stdin: stdin().is_terminal(),
            stderr: stderr().is_terminal(),
        }
    }

    /// Determine if questions should be asked interactively.
    ///
    /// Warns when defaults end up being used without being asked for.
    pub fn interactive(self, defaults: bool) -> bool {
        if defaults {
            return false;
        }

        if !(self.stdin && self.stderr) {
            warn!("no terminal to prompt on, using default answers");
            return false;
        }

        true
    }
}

/// Ask full question list.
///
/// Empty or blank text answers fall back to the question's default verbatim.
/// Answers are trimmed.
///
/// # Errors
///
/// - Return [`PromptError::Inquire`] if the terminal prompt fails or the user
///   cancels it.
#[instrument(skip(prompter, choices), level = "debug")]
pub fn ask(prompter: &mut impl Prompter, choices: &[OsxChoice]) -> Result<Answers> {
    let mut replies = Vec::with_capacity(QUESTIONS.len());
    for question in &QUESTIONS {
        let reply = prompter.text(question)?;
        let reply = match reply.trim() {
            "" => question.default.to_string(),
            reply => reply.to_string(),
        };
        debug!("{:?} => {reply:?}", question.message);
        replies.push(reply);
    }

    let osx_booleans = prompter.checkbox(OSX_MESSAGE, choices)?;
    debug!("{OSX_MESSAGE:?} => {osx_booleans:?}");

    let mut replies = replies.into_iter();
    let mut next = || replies.next().unwrap_or_default();

    Ok(Answers {
        computer_name: next(),
        git_name: next(),
        git_email: next(),
        editor: next(),
        zsh_plugins: next(),
        zsh_theme: next(),
        osx_booleans,
    })
}

/// Prompt error types.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// Terminal prompt fails.
    #[error(transparent)]
    Inquire(#[from] inquire::InquireError),
}

/// Friendly result alias :3
pub type Result<T, E = PromptError> = std::result::Result<T, E>;
