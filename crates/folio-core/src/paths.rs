//! Path display and resolution.
//!
//! Paths under the home directory are shown as `~/...`, and a leading
//! `~` typed by the user is expanded again.

use std::path::{Component, Path, PathBuf};

/// Formats a path for display, replacing the home directory with `~`.
pub fn encode_home(path: impl AsRef<Path>) -> String {
    encode_with_home(path.as_ref(), dirs::home_dir().as_deref())
}

/// Turns user input into an absolute path.
///
/// A leading `~` is expanded to the home directory and relative paths are
/// joined onto `cwd`. `.` and `..` components are folded lexically; the
/// filesystem is not consulted.
pub fn resolve(input: impl AsRef<Path>, cwd: impl AsRef<Path>) -> PathBuf {
    resolve_with_home(input.as_ref(), cwd.as_ref(), dirs::home_dir().as_deref())
}

fn encode_with_home(path: &Path, home: Option<&Path>) -> String {
    match home.and_then(|home| path.strip_prefix(home).ok()) {
        Some(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Some(rest) => format!("~/{}", rest.display()),
        None => path.display().to_string(),
    }
}

fn resolve_with_home(input: &Path, cwd: &Path, home: Option<&Path>) -> PathBuf {
    let expanded = match (input.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => input.to_path_buf(),
    };
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        cwd.join(expanded)
    };

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
