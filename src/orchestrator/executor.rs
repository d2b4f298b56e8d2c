//! Build execution: the make invocation for the BL602 project.

use crate::config::SetupConfig;
use crate::error::Result;
use crate::system::{CommandRunner, CommandSpec};
use std::path::Path;

/// Assemble the build command for the project directory.
///
/// `make CONFIG_CHIP_NAME=<chip> CONFIG_LINK_ROM=<0|1> -j<jobs>`
pub fn build_command(config: &SetupConfig, project: &Path, jobs: usize) -> CommandSpec {
    CommandSpec::new(config.build_tool.as_str())
        .arg(format!("CONFIG_CHIP_NAME={}", config.chip_name))
        .arg(format!("CONFIG_LINK_ROM={}", if config.link_rom { 1 } else { 0 }))
        .arg(format!("-j{}", jobs.max(1)))
        .current_dir(project)
}

/// Run the build in the project directory.
pub fn run_build(runner: &dyn CommandRunner, config: &SetupConfig, project: &Path) -> Result<()> {
    let jobs = config.effective_jobs();
    let command = build_command(config, project, jobs);

    log::info!("[Build] Starting build in {}", project.display());
    log::info!("[Build] {}", command);

    runner.run(&command).map_err(|e| {
        log::error!("[Build] Build failed: {}", e);
        e
    })?;

    log::info!("[Build] Build complete");
    Ok(())
}
