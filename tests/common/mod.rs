//! Shared fixtures for integration tests.

#![allow(dead_code)]

use bl602_setup::{CommandRunner, CommandSpec, Result, SetupConfig, SetupError, SetupPaths};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const SDK_URL: &str = "https://github.com/bouffalolab/bl_iot_sdk.git";

pub const GOOD_REMOTES: &str = "origin\thttps://github.com/bouffalolab/bl_iot_sdk.git (fetch)\n\
                                origin\thttps://github.com/bouffalolab/bl_iot_sdk.git (push)\n";

/// How a command was invoked on the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Run,
    Output,
    Probe,
}

/// CommandRunner that records every call and answers from a script.
///
/// Commands are matched by their display string (`program arg1 arg2`).
/// Unscripted commands succeed: `run` is Ok, `output` is empty, `probe` is true.
#[derive(Default)]
pub struct ScriptedRunner {
    calls: RefCell<Vec<(CallKind, String)>>,
    outputs: HashMap<String, String>,
    probes: HashMap<String, bool>,
    failures: HashMap<String, i32>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, cmd: &str, stdout: &str) -> Self {
        self.outputs.insert(cmd.to_string(), stdout.to_string());
        self
    }

    pub fn with_probe(mut self, cmd: &str, success: bool) -> Self {
        self.probes.insert(cmd.to_string(), success);
        self
    }

    /// Make `cmd` exit with `code` for run and output calls
    pub fn with_failure(mut self, cmd: &str, code: i32) -> Self {
        self.failures.insert(cmd.to_string(), code);
        self
    }

    /// A git checkout with the right remote, HEAD at `local`, upstream at `upstream`
    pub fn git_checkout(local: &str, upstream: &str) -> Self {
        Self::new()
            .with_probe("git rev-parse --is-inside-work-tree", true)
            .with_output("git remote -v", GOOD_REMOTES)
            .with_output("git rev-parse @", &format!("{}\n", local))
            .with_output("git rev-parse @{u}", &format!("{}\n", upstream))
    }

    pub fn calls(&self) -> Vec<(CallKind, String)> {
        self.calls.borrow().clone()
    }

    /// Display strings of all `run` calls, in order
    pub fn runs(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|(kind, _)| *kind == CallKind::Run)
            .map(|(_, cmd)| cmd.clone())
            .collect()
    }

    pub fn count(&self, cmd: &str) -> usize {
        self.calls.borrow().iter().filter(|(_, c)| c == cmd).count()
    }

    pub fn any_starting_with(&self, prefix: &str) -> bool {
        self.calls.borrow().iter().any(|(_, c)| c.starts_with(prefix))
    }

    fn record(&self, kind: CallKind, cmd: &CommandSpec) -> String {
        let key = cmd.to_string();
        self.calls.borrow_mut().push((kind, key.clone()));
        key
    }

    fn failure(&self, key: &str) -> Option<SetupError> {
        self.failures.get(key).map(|code| SetupError::CommandFailed {
            cmd: key.to_string(),
            reason: format!("exit status {}", code),
        })
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, cmd: &CommandSpec) -> Result<()> {
        let key = self.record(CallKind::Run, cmd);
        match self.failure(&key) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn output(&self, cmd: &CommandSpec) -> Result<String> {
        let key = self.record(CallKind::Output, cmd);
        if let Some(err) = self.failure(&key) {
            return Err(err);
        }
        Ok(self.outputs.get(&key).cloned().unwrap_or_default())
    }

    fn probe(&self, cmd: &CommandSpec) -> Result<bool> {
        let key = self.record(CallKind::Probe, cmd);
        Ok(self.probes.get(&key).copied().unwrap_or(true))
    }
}

/// Lay out an SDK tree with the sample project under `root`.
///
/// Returns paths as resolved from `<root>/src/port/bsp/bl602` with the
/// default offsets.
pub fn create_sdk_tree(root: &Path, makefile: &str) -> SetupPaths {
    let base = root.join("src/port/bsp/bl602");
    fs::create_dir_all(&base).expect("Failed to create base dir");

    let paths = SetupPaths::resolve(&base, &SetupConfig::default()).expect("Failed to resolve");
    fs::create_dir_all(&paths.project).expect("Failed to create project dir");
    fs::write(paths.makefile(), makefile).expect("Failed to write Makefile");
    fs::create_dir_all(paths.project_mk().parent().unwrap()).expect("Failed to create scripts");
    fs::write(paths.project_mk(), "# BL602 project rules\n").expect("Failed to write project.mk");
    paths
}

/// Settings for tests: no privilege prefix, fixed job count
pub fn test_config() -> SetupConfig {
    SetupConfig {
        privilege_command: None,
        jobs: Some(4),
        ..SetupConfig::default()
    }
}

pub const HELLOWORLD_MAKEFILE: &str = "PROJECT_NAME := helloworld\n\
                                       PROJECT_PATH := $(abspath .)\n\
                                       include $(BL60X_SDK_PATH)/make_scripts_riscv/project.mk\n";
