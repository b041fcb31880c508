//! Test support utilities for barbican integration tests.
//!
//! Provides a reusable command builder plus output assertions.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;

#[allow(unused_imports)]
pub use assertions::*;

/// Test environment for driving the compiled binary.
///
/// Every command starts from a scrubbed environment, so credentials in
/// the host's `OS_*`/`BARBICAN_*` variables cannot leak into tests.
/// Tests opt back in to specific variables with [`Test::env`].
pub struct Test {
    envs: Vec<(String, String)>,
}

impl Test {
    /// Create a new test environment with no inherited variables.
    pub fn new() -> Self {
        Self { envs: Vec::new() }
    }

    /// Provide an environment variable to subsequent commands.
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    pub(crate) fn envs(&self) -> &[(String, String)] {
        &self.envs
    }
}
