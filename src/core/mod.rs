//! Core library components.
//!
//! Credential resolution, session bootstrap, and the API operations the
//! sub-commands are built on.

pub mod constants;
pub mod credentials;
pub mod keystone;
pub mod secrets;
pub mod session;
pub mod transport;
