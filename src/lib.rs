//! barbican - Command-line client for the Barbican key management service.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Argument parsing and sub-command dispatch
//! │   └── secret        # secret list/get/store/delete
//! └── core/             # Core library components
//!     ├── credentials   # Credential bundle resolution and validation
//!     ├── session       # Session establishment
//!     ├── keystone      # Keystone v3 identity collaborator
//!     ├── transport     # Blocking HTTP transport
//!     └── secrets       # Secret model and API operations
//! ```
//!
//! Every invocation follows the same path: resolve the credential bundle
//! from flags and environment, validate it into a single authentication
//! mode, establish one session, then run the requested sub-command
//! against it.

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::credentials::{AuthMode, Credentials};
pub use crate::core::secrets::{NewSecret, Secret, SecretList};
pub use crate::core::session::Session;
