//! Resource handlers for the VMware NSX-T manager API.
//!
//! Each resource type maps a flat, schema-checked record onto one NSX-T API
//! object and reconciles it through create, read, update and delete calls.
//!
//! - [`nsxt`] - authentication, HTTP transport, client and API models
//! - [`resource`] - schema registry, resource records and the handlers
//! - [`config`] - persisted configuration and provider settings
//! - [`document`] - JSON/YAML state documents used by the CLI

pub mod config;
pub mod document;
pub mod nsxt;
pub mod resource;

/// Version injected at compile time via NSXT_PROVIDER_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("NSXT_PROVIDER_VERSION") {
    Some(v) => v,
    None => "dev",
};
