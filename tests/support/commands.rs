//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a barbican command with a scrubbed environment.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("barbican").expect("failed to find barbican binary");
        cmd.env_clear();
        for (key, value) in self.envs() {
            cmd.env(key, value);
        }
        cmd
    }

    /// Run barbican with the given arguments.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run barbican")
    }
}
