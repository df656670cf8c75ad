//! Locating tool binaries on PATH.
//!
//! Lookups walk PATH entries directly instead of shelling out to `which`,
//! whose behavior varies across systems. Freshly installed tools (uv lands
//! in `~/.local/bin` or `~/.cargo/bin`) are not on the PATH of the current
//! process, so a [`ToolLocator`] can carry extra directories.
//!
//! # Example
//!
//! ```no_run
//! use auditor_bootstrap::requirements::probe::ToolLocator;
//!
//! let locator = ToolLocator::from_env().with_user_bin_dirs();
//! if let Some(path) = locator.find("uv") {
//!     println!("uv at {}", path.display());
//! }
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Executable suffixes to try for a bare tool name.
#[cfg(windows)]
fn executable_suffixes() -> Vec<OsString> {
    let pathext = std::env::var_os("PATHEXT").unwrap_or_else(|| ".COM;.EXE;.BAT;.CMD".into());
    let mut suffixes = vec![OsString::new()];
    suffixes.extend(
        pathext
            .to_string_lossy()
            .split(';')
            .filter(|s| !s.is_empty())
            .map(|s| OsString::from(s.to_lowercase())),
    );
    suffixes
}

#[cfg(not(windows))]
fn executable_suffixes() -> Vec<OsString> {
    vec![OsString::new()]
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    let suffixes = executable_suffixes();
    for dir in path_entries {
        for suffix in &suffixes {
            let mut name = OsString::from(tool);
            name.push(suffix);
            let candidate = dir.join(name);
            if candidate.is_file() && is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Directories user-level installers drop binaries into.
pub fn user_bin_dirs() -> Vec<PathBuf> {
    dirs::home_dir()
        .map(|home| vec![home.join(".local").join("bin"), home.join(".cargo").join("bin")])
        .unwrap_or_default()
}

/// Ordered list of directories searched for tools.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolLocator {
    entries: Vec<PathBuf>,
}

impl ToolLocator {
    /// Search exactly these directories.
    pub fn new(entries: Vec<PathBuf>) -> Self {
        Self { entries }
    }

    /// Search the current process PATH.
    pub fn from_env() -> Self {
        Self::new(parse_system_path())
    }

    /// Append directories (searched after the existing ones), skipping duplicates.
    pub fn with_extra(mut self, extra: impl IntoIterator<Item = PathBuf>) -> Self {
        for dir in extra {
            if !self.entries.contains(&dir) {
                self.entries.push(dir);
            }
        }
        self
    }

    /// Append `~/.local/bin` and `~/.cargo/bin`.
    pub fn with_user_bin_dirs(self) -> Self {
        self.with_extra(user_bin_dirs())
    }

    /// Directories searched, in order.
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Find the first executable named `tool`.
    pub fn find(&self, tool: &str) -> Option<PathBuf> {
        resolve_tool_path(tool, &self.entries)
    }

    /// Find the first of several alternative binary names.
    pub fn find_any(&self, names: &[String]) -> Option<(String, PathBuf)> {
        names
            .iter()
            .find_map(|name| self.find(name).map(|path| (name.clone(), path)))
    }

    /// PATH value for child processes that should see the extra directories.
    pub fn path_value(&self) -> Option<OsString> {
        std::env::join_paths(&self.entries).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn make_tool(dir: &Path, name: &str, executable: bool) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        let mode = if executable { 0o755 } else { 0o644 };
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn resolves_first_executable() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        make_tool(first.path(), "gcloud", false);
        let expected = make_tool(second.path(), "gcloud", true);

        let entries = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        assert_eq!(resolve_tool_path("gcloud", &entries), Some(expected));
    }

    #[test]
    fn missing_tool_is_none() {
        let temp = TempDir::new().unwrap();
        let locator = ToolLocator::new(vec![temp.path().to_path_buf()]);
        assert!(locator.find("terraform").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn find_any_returns_matching_alias() {
        let temp = TempDir::new().unwrap();
        make_tool(temp.path(), "chromium-browser", true);
        let locator = ToolLocator::new(vec![temp.path().to_path_buf()]);

        let names = vec!["chromium".to_string(), "chromium-browser".to_string()];
        let (name, _) = locator.find_any(&names).unwrap();
        assert_eq!(name, "chromium-browser");
    }

    #[test]
    fn with_extra_skips_duplicates() {
        let locator = ToolLocator::new(vec![PathBuf::from("/usr/bin")])
            .with_extra(vec![PathBuf::from("/usr/bin"), PathBuf::from("/opt/bin")]);
        assert_eq!(
            locator.entries(),
            &[PathBuf::from("/usr/bin"), PathBuf::from("/opt/bin")]
        );
    }

    #[test]
    fn path_value_joins_entries() {
        let locator = ToolLocator::new(vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        let joined = locator.path_value().unwrap();
        let split: Vec<PathBuf> = std::env::split_paths(&joined).collect();
        assert_eq!(split, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
    }
}
