//! Process environment preparation for the SDK build.
//!
//! The SDK Makefiles read `SDK_PATH`, and the RISC-V cross compiler must be
//! found on `PATH` ahead of any host compiler. Both are exported into this
//! process so every child (git, make) inherits them. Nothing is restored
//! afterwards.

use crate::error::{Result, SetupError};
use crate::models::SetupPaths;
use std::ffi::{OsStr, OsString};
use std::path::Path;

pub const SDK_PATH_VAR: &str = "SDK_PATH";
pub const TOOLCHAIN_PATH_VAR: &str = "TOOLCHAIN_PATH";
pub const PATH_VAR: &str = "PATH";

/// Build a PATH value with `dir` in front of `current`.
///
/// An unset or empty `current` yields just `dir`.
pub fn prepend_to_path(dir: &Path, current: Option<&OsStr>) -> Result<OsString> {
    let mut entries = vec![dir.to_path_buf()];
    if let Some(current) = current.filter(|c| !c.is_empty()) {
        entries.extend(std::env::split_paths(current));
    }

    std::env::join_paths(entries).map_err(|e| {
        SetupError::InvalidInput(format!(
            "Toolchain path {} cannot be placed on PATH: {}",
            dir.display(),
            e
        ))
    })
}

/// Export SDK_PATH and TOOLCHAIN_PATH and put the toolchain bin dir first on PATH.
pub fn export_environment(paths: &SetupPaths) -> Result<()> {
    let toolchain_bin = paths.toolchain_bin();
    let current_path = std::env::var_os(PATH_VAR);
    let new_path = prepend_to_path(&toolchain_bin, current_path.as_deref())?;

    std::env::set_var(SDK_PATH_VAR, &paths.sdk);
    std::env::set_var(TOOLCHAIN_PATH_VAR, &paths.toolchain);
    std::env::set_var(PATH_VAR, &new_path);

    log::info!("[Env] {}={}", SDK_PATH_VAR, paths.sdk.display());
    log::info!("[Env] {}={}", TOOLCHAIN_PATH_VAR, paths.toolchain.display());
    log::debug!("[Env] {} now starts with {}", PATH_VAR, toolchain_bin.display());

    Ok(())
}
