//! Tool registry and definitions.
//!
//! Defines which tools the auditor project needs, how to find them, and
//! what to tell the user when one is missing. Binary aliases and version
//! arguments can be overridden from the `tools:` config section.

use crate::config::ToolOverride;
use crate::shell::Platform;
use std::collections::{BTreeMap, HashMap};

/// Guidance printed when Chromium is missing.
pub const CHROMIUM_GUIDANCE: &str = "Chromium is not installed. Lighthouse needs a Chromium-based browser to run audits. Install it with 'sudo apt-get install -y chromium' (Debian/Ubuntu) or 'brew install --cask chromium' (macOS).";

/// Vendor script that installs uv on Unix.
pub const UV_INSTALL_URL: &str = "https://astral.sh/uv/install.sh";

/// PowerShell snippet that installs uv on Windows.
pub const UV_POWERSHELL_INSTALL: &str = "irm https://astral.sh/uv/install.ps1 | iex";

/// How a missing tool gets installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMethod {
    /// Download the vendor install script and pipe it into `sh`; on
    /// Windows run the vendor PowerShell snippet instead.
    Script {
        /// Unix install script URL
        url: &'static str,
        /// PowerShell snippet run with `-ExecutionPolicy ByPass -c`
        powershell: &'static str,
    },
    /// Print instructions; the user installs it.
    Manual,
}

/// A tool definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    /// Registry name (e.g., "gcloud", "chromium")
    pub name: String,
    /// Binary names tried in order
    pub binaries: Vec<String>,
    /// Arguments that make the tool print its version
    pub version_args: Vec<String>,
    /// How to install it when missing
    pub install: InstallMethod,
    /// Whether `bootstrap --strict` fails when it is missing
    pub required: bool,
    guidance: Guidance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Guidance {
    Fixed(&'static str),
    PerPlatform {
        macos: &'static str,
        linux: &'static str,
        windows: &'static str,
    },
}

impl InstallMethod {
    /// The command a user can run by hand, if there is one.
    pub fn manual_command(&self, platform: Platform) -> Option<String> {
        match self {
            Self::Script { powershell, .. } if platform == Platform::Windows => Some(format!(
                "powershell -ExecutionPolicy ByPass -c \"{}\"",
                powershell
            )),
            Self::Script { url, .. } => Some(format!("curl -LsSf {} | sh", url)),
            Self::Manual => None,
        }
    }
}

impl ToolSpec {
    fn new(name: &str, binaries: &[&str], install: InstallMethod, guidance: Guidance) -> Self {
        Self {
            name: name.to_string(),
            binaries: binaries.iter().map(|b| b.to_string()).collect(),
            version_args: vec!["--version".to_string()],
            install,
            required: true,
            guidance,
        }
    }

    fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Instructions shown when the tool is missing.
    pub fn guidance(&self, platform: Platform) -> String {
        match &self.guidance {
            Guidance::Fixed(text) => text.to_string(),
            Guidance::PerPlatform {
                macos,
                linux,
                windows,
            } => match platform {
                Platform::MacOS => macos,
                Platform::Linux => linux,
                Platform::Windows => windows,
            }
            .to_string(),
        }
    }

    fn apply_override(&mut self, over: &ToolOverride) {
        if let Some(args) = &over.version_args {
            self.version_args = args.clone();
        }
        if let Some(binaries) = &over.binaries {
            if !binaries.is_empty() {
                self.binaries = binaries.clone();
            }
        }
    }
}

/// Registry of all known tools.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolSpec>,
}

impl ToolRegistry {
    /// Create a registry with the built-in tools.
    pub fn new() -> Self {
        let specs = [
            ToolSpec::new(
                "python",
                &["python3", "python"],
                InstallMethod::Manual,
                Guidance::PerPlatform {
                    macos: "Python is not installed. Install it with 'brew install python' or from https://www.python.org/downloads/.",
                    linux: "Python is not installed. Install it with 'sudo apt-get install -y python3' or from https://www.python.org/downloads/.",
                    windows: "Python is not installed. Install it with 'winget install Python.Python.3.12' or from https://www.python.org/downloads/.",
                },
            ),
            ToolSpec::new(
                "uv",
                &["uv"],
                InstallMethod::Script {
                    url: UV_INSTALL_URL,
                    powershell: UV_POWERSHELL_INSTALL,
                },
                Guidance::PerPlatform {
                    macos: "uv is not installed. Install it with 'curl -LsSf https://astral.sh/uv/install.sh | sh'.",
                    linux: "uv is not installed. Install it with 'curl -LsSf https://astral.sh/uv/install.sh | sh'.",
                    windows: "uv is not installed. Install it with 'powershell -ExecutionPolicy ByPass -c \"irm https://astral.sh/uv/install.ps1 | iex\"'.",
                },
            ),
            ToolSpec::new(
                "gcloud",
                &["gcloud"],
                InstallMethod::Manual,
                Guidance::PerPlatform {
                    macos: "The Google Cloud CLI is not installed. Install it with 'brew install --cask google-cloud-sdk' or follow https://cloud.google.com/sdk/docs/install.",
                    linux: "The Google Cloud CLI is not installed. Follow https://cloud.google.com/sdk/docs/install#linux to install it.",
                    windows: "The Google Cloud CLI is not installed. Download the installer from https://cloud.google.com/sdk/docs/install#windows.",
                },
            ),
            ToolSpec::new(
                "terraform",
                &["terraform"],
                InstallMethod::Manual,
                Guidance::PerPlatform {
                    macos: "Terraform is not installed. Install it with 'brew tap hashicorp/tap && brew install hashicorp/tap/terraform'.",
                    linux: "Terraform is not installed. Follow https://developer.hashicorp.com/terraform/install to install it.",
                    windows: "Terraform is not installed. Install it with 'winget install Hashicorp.Terraform' or from https://developer.hashicorp.com/terraform/install.",
                },
            ),
            ToolSpec::new(
                "gh",
                &["gh"],
                InstallMethod::Manual,
                Guidance::PerPlatform {
                    macos: "The GitHub CLI is not installed. Install it with 'brew install gh' or from https://cli.github.com/.",
                    linux: "The GitHub CLI is not installed. Follow https://github.com/cli/cli/blob/trunk/docs/install_linux.md to install it.",
                    windows: "The GitHub CLI is not installed. Install it with 'winget install GitHub.cli' or from https://cli.github.com/.",
                },
            )
            .optional(),
            ToolSpec::new(
                "node",
                &["node"],
                InstallMethod::Manual,
                Guidance::Fixed(
                    "Node.js is not installed. Lighthouse runs on Node.js; install it from https://nodejs.org/en/download.",
                ),
            ),
            ToolSpec::new(
                "npm",
                &["npm"],
                InstallMethod::Manual,
                Guidance::Fixed(
                    "npm is not installed. It ships with Node.js; install Node.js from https://nodejs.org/en/download.",
                ),
            ),
            ToolSpec::new(
                "chromium",
                &["chromium", "chromium-browser"],
                InstallMethod::Manual,
                Guidance::Fixed(CHROMIUM_GUIDANCE),
            ),
        ];

        Self {
            tools: specs.into_iter().map(|s| (s.name.clone(), s)).collect(),
        }
    }

    /// Apply per-tool overrides from config. Unknown names are ignored.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, ToolOverride>) -> Self {
        for (name, over) in overrides {
            match self.tools.get_mut(name) {
                Some(spec) => spec.apply_override(over),
                None => tracing::warn!(tool = %name, "ignoring override for unknown tool"),
            }
        }
        self
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.get(name)
    }

    /// All known tool names, sorted.
    pub fn known_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
