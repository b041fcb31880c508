//! Constants used throughout barbican.
//!
//! Centralizes magic strings and protocol values.

/// Timeout applied to every API and identity request, in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Keystone API version segment appended to bare auth URLs.
pub const KEYSTONE_VERSION: &str = "v3";

/// Service catalog type the Barbican endpoint is registered under.
pub const KEY_MANAGER_TYPE: &str = "key-manager";

/// Service catalog interface consumed by this client.
pub const PUBLIC_INTERFACE: &str = "public";

/// Domain id Keystone falls back to when none is supplied.
pub const DEFAULT_DOMAIN_ID: &str = "default";
