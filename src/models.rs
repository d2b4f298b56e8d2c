//! Core data structures shared across setup phases.

use crate::config::SetupConfig;
use std::path::{Component, Path, PathBuf};

/// Absolute locations the setup run works on.
///
/// Derived from a base directory plus fixed relative offsets. Resolution is
/// purely lexical: nothing needs to exist yet and symlinks are not followed,
/// so a missing SDK can still be reported with its intended location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetupPaths {
    pub sdk: PathBuf,
    pub toolchain: PathBuf,
    pub project: PathBuf,
}

impl SetupPaths {
    /// Resolve the configured offsets against `base`.
    ///
    /// A relative `base` is taken relative to the process working directory.
    pub fn resolve(base: &Path, config: &SetupConfig) -> std::io::Result<Self> {
        let base = if base.is_absolute() {
            base.to_path_buf()
        } else {
            std::env::current_dir()?.join(base)
        };

        Ok(SetupPaths {
            sdk: normalize_lexically(&base.join(&config.sdk_relative)),
            toolchain: normalize_lexically(&base.join(&config.toolchain_relative)),
            project: normalize_lexically(&base.join(&config.project_relative)),
        })
    }

    /// Resolve against the configured base dir, or the working directory.
    pub fn from_config(config: &SetupConfig) -> std::io::Result<Self> {
        match &config.base_dir {
            Some(base) => Self::resolve(base, config),
            None => Self::resolve(&std::env::current_dir()?, config),
        }
    }

    /// Directory holding the cross-compiler binaries
    pub fn toolchain_bin(&self) -> PathBuf {
        self.toolchain.join("bin")
    }

    pub fn makefile(&self) -> PathBuf {
        self.project.join("Makefile")
    }

    /// SDK build rules the project Makefile includes
    pub fn project_mk(&self) -> PathBuf {
        self.sdk.join("make_scripts_riscv").join("project.mk")
    }
}

/// Collapse `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root, matching `abspath` behaviour.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(p) => out.push(p.as_os_str()),
            Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// What the SDK phase ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdkOutcome {
    /// Local checkout already matched upstream
    UpToDate,
    /// Local checkout was behind and has been pulled
    Pulled,
    /// Directory was not a git work tree and a fresh clone was made
    Cloned,
}

impl SdkOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SdkOutcome::UpToDate => "up-to-date",
            SdkOutcome::Pulled => "pulled",
            SdkOutcome::Cloned => "cloned",
        }
    }
}

/// Result of the Makefile fixup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Marker already present, file untouched
    AlreadyPresent,
    /// Line appended
    Appended,
    /// Dry run: the line would have been appended
    WouldAppend,
}
