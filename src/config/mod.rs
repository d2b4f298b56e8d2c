//! Configuration module for the BL602 setup run.
//!
//! Every constant of the setup flow (path offsets, SDK remote, host packages,
//! build flags, Makefile fixup) lives in [`SetupConfig`]. Its `Default`
//! reproduces the stock BL602 setup exactly, so a run without a settings file
//! and without flags behaves like the fixed script.
//!
//! # Module Structure
//!
//! - `loader`: loads/saves settings JSON and resolves the per-user settings path
//!
//! # Configuration Flow
//!
//! 1. `loader::load_effective_config` picks the explicit file, the per-user
//!    file, or the defaults
//! 2. CLI flags override individual fields (see `main.rs`)
//! 3. `SetupConfig::validate` rejects inconsistent values before any step runs

pub mod loader;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Upstream location of the vendor SDK
pub const DEFAULT_SDK_REMOTE: &str = "https://github.com/bouffalolab/bl_iot_sdk.git";

/// Settings for one setup run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    /// Directory the relative offsets are resolved against (None = working directory)
    pub base_dir: Option<PathBuf>,

    // Path offsets, relative to base_dir
    pub sdk_relative: PathBuf,
    pub toolchain_relative: PathBuf,
    pub project_relative: PathBuf,

    /// Clone URL of the SDK repository
    pub sdk_remote_url: String,

    /// Host packages installed through apt-get
    pub packages: Vec<String>,

    /// Privilege escalation prefix for the package manager (None = run directly)
    pub privilege_command: Option<String>,
    pub skip_install: bool,

    // Build invocation
    pub build_tool: String,
    pub chip_name: String,
    pub link_rom: bool,
    /// Parallel jobs for the build (None = logical CPU count)
    pub jobs: Option<usize>,
    pub skip_build: bool,

    // Makefile fixup
    pub makefile_marker: String,
    pub makefile_line: String,

    /// Log mutating commands instead of running them
    pub dry_run: bool,

    /// Directory for the session log file (None = stderr only)
    pub log_dir: Option<PathBuf>,
}

impl Default for SetupConfig {
    fn default() -> Self {
        SetupConfig {
            base_dir: None,
            sdk_relative: PathBuf::from("../../bsp/bl_iot_sdk"),
            toolchain_relative: PathBuf::from("../../bsp/bl_iot_sdk/toolchain/riscv/Linux"),
            project_relative: PathBuf::from(
                "../../bsp/bl_iot_sdk/customer_app/get-start/helloworld",
            ),
            sdk_remote_url: DEFAULT_SDK_REMOTE.to_string(),
            packages: vec!["make".to_string(), "gtkterm".to_string()],
            privilege_command: Some("sudo".to_string()),
            skip_install: false,
            build_tool: "make".to_string(),
            chip_name: "BL602".to_string(),
            link_rom: true,
            jobs: None,
            skip_build: false,
            makefile_marker: "PROJECT_MK_PATH".to_string(),
            makefile_line: "PROJECT_MK_PATH = $(SDK_PATH)/make_scripts_riscv".to_string(),
            dry_run: false,
            log_dir: None,
        }
    }
}

impl SetupConfig {
    /// Check the settings for values that would make the run misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sdk_remote_url.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "SDK remote URL cannot be empty".to_string(),
            ));
        }

        if self.build_tool.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Build tool cannot be empty".to_string(),
            ));
        }

        if self.chip_name.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Chip name cannot be empty".to_string(),
            ));
        }

        if self.jobs == Some(0) {
            return Err(ConfigError::ValidationFailed(
                "Job count must be at least 1".to_string(),
            ));
        }

        if self.makefile_marker.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Makefile marker cannot be empty".to_string(),
            ));
        }

        // The appended line must itself satisfy the marker check, otherwise
        // every run would append another copy.
        if !self.makefile_line.contains(&self.makefile_marker) {
            return Err(ConfigError::ValidationFailed(format!(
                "Makefile line '{}' does not contain marker '{}'",
                self.makefile_line, self.makefile_marker
            )));
        }

        if self.makefile_line.contains('\n') {
            return Err(ConfigError::ValidationFailed(
                "Makefile line must be a single line".to_string(),
            ));
        }

        if let Some(cmd) = &self.privilege_command {
            if cmd.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(
                    "Privilege command cannot be blank (omit it instead)".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Job count for the build: explicit setting or the logical CPU count.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(num_cpus::get).max(1)
    }
}
