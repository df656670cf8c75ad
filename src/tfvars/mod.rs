//! Terraform variables file handling.
//!
//! The file is read, validated and updated here; provisioning is left to
//! Terraform.
//!
//! - [`parser`] - layout-preserving `.tfvars` parser
//! - [`vars`] - typed deployment variables and validation
//! - [`edit`] - in-place updates

pub mod edit;
pub mod parser;
pub mod vars;

pub use edit::{parse_assignment, update_vars};
pub use parser::{TfValue, TfvarsDocument};
pub use vars::{DeploymentVars, VarsIssue};
