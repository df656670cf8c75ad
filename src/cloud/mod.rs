//! Google Cloud project preparation.

pub mod apis;

pub use apis::{enable_cloud_apis, parse_enabled_services, ApiReport};
