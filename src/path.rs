// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Path resolution utilities.
//!
//! Determine the home directory that every dotfile path is derived from, and
//! compute relative paths for symlink creation.

use std::path::{Component, Path, PathBuf};

/// Determine absolute path to user's home directory.
///
/// Does not check if the path returned actually exists.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(NoWayHome)
}

/// Compute path of `target` relative to directory `base`.
///
/// Both paths are expected to be absolute. Purely lexical, so neither path
/// needs to exist, and symlinks along the way are not resolved.
///
/// ```text
/// base:   /home/eduardo
/// target: /home/eduardo/.dotfiles/.zshrc
/// result: .dotfiles/.zshrc
/// ```
pub fn relative_path(base: impl AsRef<Path>, target: impl AsRef<Path>) -> PathBuf {
    let base = normalize(base.as_ref());
    let target = normalize(target.as_ref());

    let common = base
        .iter()
        .zip(target.iter())
        .take_while(|(lhs, rhs)| lhs == rhs)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }

    if relative.as_os_str().is_empty() {
        relative.push(".");
    }

    relative
}

// INVARIANT: Drop "." and fold ".." into its parent, leaving only root and
// normal components behind.
fn normalize(path: &Path) -> Vec<Component<'_>> {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => continue,
            Component::ParentDir => {
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                } else {
                    components.push(component);
                }
            }
            _ => components.push(component),
        }
    }

    components
}

/// No way to determine user's home directory.
///
/// # See Also
///
/// - [`dirs::home_dir`](https://docs.rs/dirs/latest/dirs/fn.home_dir.html)
#[derive(Clone, Debug, thiserror::Error)]
#[error("cannot determine absolute path to user's home directory")]
pub struct NoWayHome;

/// Friendly result alias :3
pub type Result<T, E = NoWayHome> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use simple_test_case::test_case;

    #[test_case("/home/blah", "/home/blah/.dotfiles/.zshrc", ".dotfiles/.zshrc"; "descend")]
    #[test_case("/home/blah/.dotfiles/.oh-my-zsh/themes", "/home/blah/.dotfiles/themes/dracula/zsh/dracula.zsh-theme", "../../themes/dracula/zsh/dracula.zsh-theme"; "sibling tree")]
    #[test_case("/usr/local/bin", "/Applications/Sublime Text.app/Contents/SharedSupport/bin/subl", "../../../Applications/Sublime Text.app/Contents/SharedSupport/bin/subl"; "across root")]
    #[test_case("/home/blah/./foo/../bar", "/home/blah/bar/baz", "baz"; "dot components")]
    #[test_case("/home/blah", "/home/blah", "."; "same directory")]
    #[test]
    fn relative_path_between(base: &str, target: &str, expect: &str) {
        pretty_assertions::assert_eq!(relative_path(base, target), PathBuf::from(expect));
    }
}
