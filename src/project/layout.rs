//! Project layout verification.
//!
//! Every mismatch is a warning: the run always continues so the user can
//! see everything that is wrong at once.

use std::path::{Path, PathBuf};

use crate::config::{LayoutConfig, SentinelDir};
use crate::ui::UserInterface;

/// What the working directory looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    /// The directory that was inspected
    pub root: PathBuf,
    /// Manifest file name (`pyproject.toml`)
    pub manifest: String,
    /// Whether the manifest exists
    pub manifest_present: bool,
    /// Expected subdirectories and whether each exists
    pub subdirs: Vec<(String, bool)>,
    /// Name of the working directory itself
    pub dir_name: Option<String>,
    /// Name of its parent directory
    pub parent_dir_name: Option<String>,
    /// Everything that did not match
    pub warnings: Vec<String>,
}

impl ProjectContext {
    /// Whether an expected subdirectory exists.
    pub fn has_subdir(&self, name: &str) -> bool {
        self.subdirs.iter().any(|(n, present)| n == name && *present)
    }

    /// Whether the layout matched completely.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Print the result.
    pub fn report(&self, ui: &mut dyn UserInterface) {
        if self.is_clean() {
            ui.success(&format!("Project layout looks right ({})", self.root.display()));
            return;
        }
        for warning in &self.warnings {
            ui.warning(warning);
        }
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// Inspect `root` against the expected layout.
pub fn verify_project_layout(root: &Path, layout: &LayoutConfig) -> ProjectContext {
    let mut warnings = Vec::new();

    let manifest_present = root.join(&layout.manifest).is_file();
    if !manifest_present {
        warnings.push(format!(
            "{} not found in {}; run this from the project root",
            layout.manifest,
            root.display()
        ));
    }

    let subdirs: Vec<(String, bool)> = layout
        .subdirs
        .iter()
        .map(|name| (name.clone(), root.join(name).is_dir()))
        .collect();
    for (name, present) in &subdirs {
        if !present {
            warnings.push(format!("Expected directory '{}' not found", name));
        }
    }

    // Canonicalize so `.` still has a name.
    let resolved = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    let dir_name = file_name(&resolved);
    let parent_dir_name = resolved.parent().and_then(file_name);

    if let Some(expected) = &layout.expected_dir_name {
        let (which, actual) = match layout.sentinel {
            SentinelDir::Parent => ("Parent directory", &parent_dir_name),
            SentinelDir::Own => ("Working directory", &dir_name),
        };
        if actual.as_deref() != Some(expected.as_str()) {
            warnings.push(format!(
                "{} is '{}', expected '{}'",
                which,
                actual.as_deref().unwrap_or("/"),
                expected
            ));
        }
    }

    tracing::debug!(
        root = %root.display(),
        manifest_present,
        warnings = warnings.len(),
        "verified project layout"
    );

    ProjectContext {
        root: root.to_path_buf(),
        manifest: layout.manifest.clone(),
        manifest_present,
        subdirs,
        dir_name,
        parent_dir_name,
        warnings,
    }
}
