//! Tool check and install outcome types.

use std::path::PathBuf;

/// The result of looking for a single tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCheckResult {
    /// Registry name of the tool (`chromium`, not `chromium-browser`)
    pub name: String,
    /// Whether an executable was found
    pub installed: bool,
    /// Resolved binary path
    pub path: Option<PathBuf>,
    /// Trimmed output of the version invocation, if it succeeded
    pub version: Option<String>,
}

impl ToolCheckResult {
    /// A tool that was not found.
    pub fn absent(name: &str) -> Self {
        Self {
            name: name.to_string(),
            installed: false,
            path: None,
            version: None,
        }
    }

    /// A tool found at `path`.
    pub fn found(name: &str, path: PathBuf, version: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            installed: true,
            path: Some(path),
            version,
        }
    }

    /// First line of the version output, for one-line displays.
    ///
    /// `gcloud --version` prints one line per component.
    pub fn version_line(&self) -> Option<&str> {
        self.version
            .as_deref()
            .and_then(|v| v.lines().map(str::trim).find(|l| !l.is_empty()))
    }

    /// Program to invoke: the resolved path, or the bare name.
    pub fn program(&self) -> String {
        self.path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| self.name.clone())
    }
}

/// What happened when a tool install was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Nothing to do.
    AlreadyInstalled,
    /// The installer ran and the tool is now found.
    Installed {
        /// Version reported after install
        version: Option<String>,
    },
    /// The installer ran but the tool is still missing, or the installer failed.
    Failed {
        /// What went wrong
        message: String,
        /// Command the user can run by hand
        fallback: String,
    },
    /// No automated installer; the user has to follow these instructions.
    ManualRequired {
        /// Platform-specific instructions
        instructions: String,
    },
    /// The user said no.
    Declined,
}

impl InstallOutcome {
    /// Whether the tool is available after this outcome.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::AlreadyInstalled | Self::Installed { .. })
    }
}
