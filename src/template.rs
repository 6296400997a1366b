// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Dotfile templates.
//!
//! Each dotfile dotstrap generates has its own render function that maps the
//! fields of [`SetupConfig`] onto the resulting text. Nothing is looked up by
//! name at runtime, so a missing answer is a compile error rather than an
//! empty substitution.
//!
//! The `.osx` template is the odd one out. It does not use the selected OSX
//! choices as-is, but expands them into a flag per choice through
//! [`SetupConfig::osx_flags`] right before rendering, so that every choice
//! is written out either enabled or disabled.

use crate::{
    config::{OsxFlags, SetupConfig},
    shell::quote,
};

use std::{
    fmt::Write as _,
    fs::write,
    path::{Path, PathBuf},
};
use tracing::{info, instrument};

/// Dotfile template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    GitConfig,
    GitIgnore,
    Zshrc,
    Osx,
}

impl Template {
    /// All templates in render order.
    pub const ALL: [Template; 4] = [
        Template::GitConfig,
        Template::GitIgnore,
        Template::Osx,
        Template::Zshrc,
    ];

    /// Destination of rendered template.
    pub fn destination(self, config: &SetupConfig) -> &Path {
        match self {
            Template::GitConfig => &config.paths.git.gitconfig,
            Template::GitIgnore => &config.paths.git.gitignore,
            Template::Zshrc => &config.paths.zsh.zshrc,
            Template::Osx => &config.paths.osx.osx,
        }
    }

    /// Render template.
    pub fn render(self, config: &SetupConfig) -> String {
        match self {
            Template::GitConfig => render_gitconfig(config),
            Template::GitIgnore => render_gitignore(),
            Template::Zshrc => render_zshrc(config),
            Template::Osx => render_osx(config, &config.osx_flags()),
        }
    }
}

/// Render every template, and write results to their destinations.
///
/// Existing files are overwritten. Missing parent directories are created.
///
/// # Errors
///
/// - Return [`TemplateError::Write`] if a destination cannot be written.
#[instrument(skip(config), level = "debug")]
pub fn write_all(config: &SetupConfig) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(Template::ALL.len());
    for template in Template::ALL {
        let destination = template.destination(config);
        info!("render {template:?} to {:?}", destination.display());
        write_file(destination, template.render(config))?;
        written.push(destination.to_path_buf());
    }

    Ok(written)
}

fn write_file(path: &Path, contents: String) -> Result<()> {
    let map_err = |err| TemplateError::Write {
        source: err,
        path: path.to_path_buf(),
    };

    if let Some(parent) = path.parent() {
        mkdirp::mkdirp(parent).map_err(map_err)?;
    }
    write(path, contents).map_err(map_err)
}

/// Render `.gitconfig`.
pub fn render_gitconfig(config: &SetupConfig) -> String {
    let answers = &config.answers;
    format!(
        "\
[user]
\tname = {name}
\temail = {email}
[core]
\teditor = {editor}
\texcludesfile = {excludes}
\tautocrlf = input
\twhitespace = trailing-space,space-before-tab
[color]
\tui = auto
[alias]
\tco = checkout
\tbr = branch
\tci = commit
\tst = status
\tlg = log --graph --pretty=format:'%Cred%h%Creset -%C(yellow)%d%Creset %s %Cgreen(%cr) %C(bold blue)<%an>%Creset' --abbrev-commit
\tunstage = reset HEAD --
[push]
\tdefault = current
[pull]
\trebase = true
",
        name = git_value(&answers.git_name),
        email = git_value(&answers.git_email),
        editor = git_value(&editor_command(&answers.editor)),
        excludes = config.paths.git.gitignore.display(),
    )
}

/// Render `.gitignore_global`.
pub fn render_gitignore() -> String {
    "\
# OS generated files
.DS_Store
.DS_Store?
._*
.Spotlight-V100
.Trashes
Icon?
ehthumbs.db
Thumbs.db

# Editors
*.swp
*.swo
*~
.idea/
*.sublime-project
*.sublime-workspace

# Logs and packages
*.log
*.gz
*.zip
*.tar
node_modules/
"
    .to_string()
}

/// Render `.zshrc`.
pub fn render_zshrc(config: &SetupConfig) -> String {
    let answers = &config.answers;
    let paths = &config.paths;
    format!(
        "\
export ZSH={oh_my_zsh}
ZSH_THEME={theme}
plugins=({plugins})

source $ZSH/oh-my-zsh.sh

export EDITOR={editor}
export PATH=\"{rbenv}/bin:/usr/local/bin:$PATH\"

eval \"$(rbenv init -)\"
",
        oh_my_zsh = paths.zsh.oh_my_zsh.display(),
        theme = quote(&answers.zsh_theme),
        plugins = answers
            .zsh_plugins
            .split_whitespace()
            .map(quote)
            .collect::<Vec<_>>()
            .join(" "),
        editor = quote(editor_command(&answers.editor)),
        rbenv = paths.ruby.rbenv_system.display(),
    )
}

/// Render `.osx` with expanded choice flags.
///
/// Writes a `defaults write` line for every choice in the choice list, with
/// its flag as the boolean value.
pub fn render_osx(config: &SetupConfig, flags: &OsxFlags) -> String {
    let name = quote(&config.answers.computer_name);
    let mut out = format!(
        "\
#!/usr/bin/env bash

# Ask for the administrator password upfront
sudo -v

# Computer name
sudo scutil --set ComputerName {name}
sudo scutil --set HostName {name}
sudo scutil --set LocalHostName {name}
sudo defaults write /Library/Preferences/SystemConfiguration/com.apple.smb.server NetBIOSName -string {name}
"
    );

    for choice in &config.choices {
        let flag = flags.get(&choice.value).unwrap_or(false);
        // INVARIANT: Writing into a String never fails.
        let _ = write!(
            out,
            "\n# {label}\ndefaults write {domain} {key} -bool {flag}\n",
            label = choice.name,
            domain = choice.domain,
            key = choice.key,
        );
    }

    out.push_str(concat!(
        "\n# Restart affected applications\n",
        "for app in Finder Dock SystemUIServer; do\n",
        "    killall \"$app\" > /dev/null 2>&1\n",
        "done\n",
    ));

    out
}

// INVARIANT: Sublime Text has to block until the file closes to act as an
// editor for git and the shell.
fn editor_command(editor: &str) -> String {
    match editor {
        "subl" => "subl -w".into(),
        editor => editor.into(),
    }
}

// INVARIANT: Values with characters git config treats specially are double
// quoted, with backslashes and quotes escaped.
fn git_value(value: &str) -> String {
    let special = |c: char| matches!(c, '"' | '\\' | '#' | ';');
    if !value.contains(special) && value.trim() == value {
        return value.into();
    }

    format!("\"{}\"", value.replace('\\', r"\\").replace('"', r#"\""#))
}

/// Template error types.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Rendered template cannot be written.
    #[error("failed to write template to {:?}", path.display())]
    Write {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = TemplateError> = std::result::Result<T, E>;
