//! The Python project the tool prepares.
//!
//! - [`layout`] - manifest, subdirectory and directory-name checks
//! - [`venv`] - the isolated Python environment
//! - [`deps`] - Python and Node dependency installs

pub mod deps;
pub mod layout;
pub mod venv;

pub use deps::{install_dependencies, install_node_deps, local_lighthouse};
pub use layout::{verify_project_layout, ProjectContext};
pub use venv::{ensure_virtual_environment, inspect_venv, venv_python, VenvState};
