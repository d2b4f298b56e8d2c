//! BL602 build environment setup
//!
//! Prepares a host for building Bouffalo Lab BL602 firmware: installs host
//! tools, syncs the vendor `bl_iot_sdk` checkout, validates the sample
//! project, fixes up its Makefile and runs `make` with the chip flags.
//!
//! The system is organized into functional modules:
//! - **error**: Unified error type hierarchy
//! - **models**: Paths and phase outcomes
//! - **config**: Settings with defaults matching the stock BL602 setup
//! - **system**: Command execution seam, environment export, apt-get
//! - **sdk**: SDK clone/fetch/pull state machine over the git CLI
//! - **project**: Existence checks and the Makefile fixup
//! - **orchestrator**: Phase sequencing and the make invocation
//! - **log_collector**: `log` backend (stderr + optional session file)

// Core foundational modules
pub mod error;
pub mod models;

pub mod config;
pub mod system;
pub mod sdk;
pub mod project;
pub mod orchestrator;

pub mod log_collector;

// Re-export the log crate for macro usage
pub use log;

pub use log_collector::LogCollector;

// ============================================================================
// PUBLIC RE-EXPORTS FOR CONVENIENCE
// ============================================================================

pub use error::{ConfigError, Result, SetupError};

pub use models::{PatchOutcome, SdkOutcome, SetupPaths};

pub use config::SetupConfig;

pub use system::{CommandRunner, CommandSpec, DryRunRunner, SystemRunner};

pub use orchestrator::{OrchestrationState, SetupOrchestrator, SetupPhase};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
