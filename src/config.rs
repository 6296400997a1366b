// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Specify the layout of everything that drives a setup run: the dotfile
//! paths derived from the user's home directory, the answers collected by the
//! prompt, the OSX choice list, and the optional profile file that presets
//! any of them. [`Profile::load`] is the only place that touches the disk.
//!
//! # Profile Layout
//!
//! A __profile__ is a TOML file with two sections. The settings section
//! tweaks where and how the setup runs. The answers section, when present,
//! replaces the interactive prompt entirely.
//!
//! ```toml
//! [settings]
//! home = "$HOME"
//! shell = "/bin/bash"
//!
//! [answers]
//! computer_name = "eduardo"
//! git_name = "Eduardo Lundgren"
//! git_email = "eduardo.lundgren@liferay.com"
//! editor = "subl"
//! zsh_plugins = "ant git history-substring-search z zsh-syntax-highlighting"
//! zsh_theme = "dracula"
//! osx_booleans = ["finder_show_hidden_files"]
//! ```

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::warn;

/// Static OSX choice list shipped with dotstrap.
pub const OSX_CHOICES: &str = include_str!("../templates/osx.json");

/// Default shell used to run shell tasks.
pub const DEFAULT_SHELL: &str = "/bin/bash";

/// Every dotfile path that a setup run reads from or writes to.
///
/// All paths are derived from a single home directory base, and are never
/// modified after construction.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Paths {
    pub home: PathBuf,
    pub dotfiles: PathBuf,
    pub git: GitPaths,
    pub osx: OsxPaths,
    pub ruby: RubyPaths,
    pub themes: ThemePaths,
    pub z: ZPaths,
    pub zsh: ZshPaths,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct GitPaths {
    pub gitconfig: PathBuf,
    pub gitignore: PathBuf,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct OsxPaths {
    pub osx: PathBuf,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RubyPaths {
    pub build: PathBuf,
    pub rbenv: PathBuf,
    pub rbenv_system: PathBuf,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ThemePaths {
    pub dracula: PathBuf,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ZPaths {
    pub z_system: PathBuf,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ZshPaths {
    pub oh_my_zsh: PathBuf,
    pub plugin_syntax: PathBuf,
    pub theme_dracula: PathBuf,
    pub zshrc: PathBuf,
    pub zshrc_system: PathBuf,
}

impl Paths {
    /// Derive full path layout from home directory.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let dotfiles = home.join(".dotfiles");
        let oh_my_zsh = dotfiles.join(".oh-my-zsh");

        Self {
            git: GitPaths {
                gitconfig: dotfiles.join(".gitconfig"),
                gitignore: dotfiles.join(".gitignore_global"),
            },
            osx: OsxPaths {
                osx: dotfiles.join(".osx"),
            },
            ruby: RubyPaths {
                build: dotfiles.join(".rbenv").join("plugins").join("ruby-build"),
                rbenv: dotfiles.join(".rbenv"),
                rbenv_system: home.join(".rbenv"),
            },
            themes: ThemePaths {
                dracula: dotfiles.join("themes").join("dracula"),
            },
            z: ZPaths {
                z_system: home.join(".z"),
            },
            zsh: ZshPaths {
                plugin_syntax: oh_my_zsh
                    .join("custom")
                    .join("plugins")
                    .join("zsh-syntax-highlighting"),
                theme_dracula: oh_my_zsh.join("themes").join("dracula.zsh-theme"),
                oh_my_zsh,
                zshrc: dotfiles.join(".zshrc"),
                zshrc_system: home.join(".zshrc"),
            },
            dotfiles,
            home,
        }
    }
}

/// Answers collected from the prompt.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct Answers {
    /// Name given to the machine through `scutil`.
    pub computer_name: String,

    /// Git author name.
    pub git_name: String,

    /// Git author email.
    pub git_email: String,

    /// Editor command for git and the shell.
    pub editor: String,

    /// Space separated Oh My Zsh plugin names.
    pub zsh_plugins: String,

    /// Oh My Zsh theme name.
    pub zsh_theme: String,

    /// Identifiers of selected OSX choices.
    #[serde(default)]
    pub osx_booleans: Vec<String>,
}

impl Answers {
    /// Answers obtained by accepting every default of the prompt.
    pub fn defaults(choices: &[OsxChoice]) -> Self {
        Self {
            computer_name: "eduardo".into(),
            git_name: "Eduardo Lundgren".into(),
            git_email: "eduardo.lundgren@liferay.com".into(),
            editor: "subl".into(),
            zsh_plugins: "ant git history-substring-search z zsh-syntax-highlighting".into(),
            zsh_theme: "dracula".into(),
            osx_booleans: choices
                .iter()
                .filter(|choice| choice.checked)
                .map(|choice| choice.value.clone())
                .collect(),
        }
    }
}

/// Single entry of the OSX choice list.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct OsxChoice {
    /// Label shown by the prompt.
    pub name: String,

    /// Identifier stored in [`Answers::osx_booleans`].
    pub value: String,

    /// Selected by default.
    #[serde(default)]
    pub checked: bool,

    /// Preference domain handed to `defaults write`.
    pub domain: String,

    /// Preference key handed to `defaults write`.
    pub key: String,
}

impl Display for OsxChoice {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.name.as_str())
    }
}

/// Parse OSX choice list from JSON.
///
/// # Errors
///
/// - Return [`ConfigError::Choices`] if the list is malformed.
pub fn parse_osx_choices(data: &str) -> Result<Vec<OsxChoice>> {
    Ok(serde_json::from_str(data)?)
}

/// Load the OSX choice list shipped with dotstrap.
///
/// # Errors
///
/// - Return [`ConfigError::Choices`] if the list is malformed.
pub fn osx_choices() -> Result<Vec<OsxChoice>> {
    parse_osx_choices(OSX_CHOICES)
}

/// Boolean flag for every OSX choice.
///
/// Keeps the ordering of the choice list.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct OsxFlags {
    flags: Vec<(String, bool)>,
}

impl OsxFlags {
    /// Expand selected choice identifiers into a flag per choice.
    ///
    /// Every selected identifier maps to `true`, and every other choice to
    /// `false`. Selected identifiers missing from the choice list are
    /// dropped.
    pub fn expand(choices: &[OsxChoice], selected: &[String]) -> Self {
        for unknown in selected
            .iter()
            .filter(|value| !choices.iter().any(|choice| &choice.value == *value))
        {
            warn!("ignore unknown osx choice {unknown:?}");
        }

        let flags = choices
            .iter()
            .map(|choice| (choice.value.clone(), selected.contains(&choice.value)))
            .collect();

        Self { flags }
    }

    /// Look up flag of choice identifier.
    pub fn get(&self, value: impl AsRef<str>) -> Option<bool> {
        self.flags
            .iter()
            .find(|(key, _)| key == value.as_ref())
            .map(|(_, flag)| *flag)
    }
}

/// Full configuration of a setup run.
///
/// Built once the prompt finishes, then handed immutably to every task.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SetupConfig {
    pub paths: Paths,
    pub answers: Answers,
    pub choices: Vec<OsxChoice>,
}

impl SetupConfig {
    /// Construct new setup configuration.
    pub fn new(paths: Paths, answers: Answers, choices: Vec<OsxChoice>) -> Self {
        Self {
            paths,
            answers,
            choices,
        }
    }

    /// Expand selected OSX choices into flags.
    pub fn osx_flags(&self) -> OsxFlags {
        OsxFlags::expand(&self.choices, &self.answers.osx_booleans)
    }
}

/// Profile layout.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Settings of the setup run.
    #[serde(default)]
    pub settings: ProfileSettings,

    /// Preset answers, skips the prompt when present.
    pub answers: Option<Answers>,
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut profile: Profile = toml::de::from_str(data).map_err(ConfigError::Deserialize)?;

        // INVARIANT: Perform shell expansion on home field.
        if let Some(home) = &profile.settings.home {
            profile.settings.home = Some(PathBuf::from(
                shellexpand::full(home.to_string_lossy().as_ref())
                    .map_err(ConfigError::ShellExpansion)?
                    .into_owned(),
            ));
        }

        Ok(profile)
    }
}

impl Display for Profile {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::ser::to_string_pretty(self)
                .map_err(ConfigError::Serialize)?
                .as_str(),
        )
    }
}

impl Profile {
    /// Read and parse profile file.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::Read`] if profile cannot be read.
    /// - Return [`ConfigError::Deserialize`] if profile is malformed.
    /// - Return [`ConfigError::ShellExpansion`] if home cannot be expanded.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref()).map_err(|err| ConfigError::Read {
            source: err,
            path: path.as_ref().to_path_buf(),
        })?;
        data.parse()
    }
}

/// Profile settings.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct ProfileSettings {
    /// Home directory to derive dotfile paths from.
    pub home: Option<PathBuf>,

    /// Shell binary that runs shell tasks.
    pub shell: Option<String>,
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read profile.
    #[error("failed to read profile at {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed to deserialize profile.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to serialize profile.
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    /// Failed to parse OSX choice list.
    #[error("malformed osx choice list")]
    Choices(#[from] serde_json::Error),

    /// Failed to perform shell expansion on profile.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),
}

impl From<ConfigError> for FmtError {
    fn from(_: ConfigError) -> Self {
        FmtError
    }
}

/// Friendly result alias :3
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
