//! Existence checks for the project tree and SDK build rules.

use crate::error::{Result, SetupError};
use crate::models::SetupPaths;
use std::path::Path;

/// The project directory must exist and be a directory.
pub fn check_project_dir(project: &Path) -> Result<()> {
    if !project.is_dir() {
        log::error!("[Validate] Project path {} does not exist", project.display());
        return Err(SetupError::ProjectMissing(project.to_path_buf()));
    }
    log::info!("[Validate] ✓ Project path found: {}", project.display());
    Ok(())
}

/// The project must contain a regular `Makefile`.
pub fn check_makefile(makefile: &Path) -> Result<()> {
    if !makefile.is_file() {
        log::error!("[Validate] Makefile not found at {}", makefile.display());
        return Err(SetupError::MakefileMissing(makefile.to_path_buf()));
    }
    log::info!("[Validate] ✓ Makefile found");
    Ok(())
}

/// The SDK must provide `make_scripts_riscv/project.mk`.
pub fn check_project_mk(project_mk: &Path) -> Result<()> {
    if !project_mk.is_file() {
        log::error!("[Validate] project.mk not found at {}", project_mk.display());
        return Err(SetupError::ProjectMkMissing(project_mk.to_path_buf()));
    }
    log::info!("[Validate] ✓ project.mk found");
    Ok(())
}

/// Run the three checks in order, failing at the first missing item.
pub fn validate_project(paths: &SetupPaths) -> Result<()> {
    check_project_dir(&paths.project)?;
    check_makefile(&paths.makefile())?;
    check_project_mk(&paths.project_mk())?;
    Ok(())
}
