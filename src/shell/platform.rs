//! OS, login shell and CI detection.

use std::path::Path;

/// Operating system family, used to pick install instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOS,
    Linux,
    Windows,
}

impl Platform {
    /// The platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOS
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }
}

/// The user's login shell, as far as installers care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginShell {
    /// bash, zsh, sh and anything else POSIX-like.
    Posix,
    Fish,
    /// PowerShell or cmd.
    Windows,
}

impl LoginShell {
    /// Classify a shell by its executable path.
    pub fn from_path(exe: &str) -> Self {
        let stem = Path::new(exe)
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match stem.as_str() {
            "fish" => LoginShell::Fish,
            "pwsh" | "powershell" | "cmd" => LoginShell::Windows,
            _ => LoginShell::Posix,
        }
    }

    /// Read `$SHELL` (or `%COMSPEC%` on Windows).
    pub fn detect() -> Self {
        let var = if cfg!(target_os = "windows") { "COMSPEC" } else { "SHELL" };
        match std::env::var(var) {
            Ok(exe) => Self::from_path(&exe),
            Err(_) if cfg!(target_os = "windows") => LoginShell::Windows,
            Err(_) => LoginShell::Posix,
        }
    }

    /// What to run so tools installed under `~/.local/bin` are on PATH.
    pub fn reload_hint(self) -> &'static str {
        match self {
            LoginShell::Posix => "source $HOME/.local/bin/env",
            LoginShell::Fish => "source $HOME/.local/bin/env.fish",
            LoginShell::Windows => "Open a new terminal so the updated PATH takes effect",
        }
    }
}

const CI_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "JENKINS_URL",
    // Cloud Build
    "BUILD_ID",
];

/// True when any well-known CI variable is set.
pub fn is_ci() -> bool {
    CI_VARS.iter().any(|v| std::env::var_os(v).is_some())
}
