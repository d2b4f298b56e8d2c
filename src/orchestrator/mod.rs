//! Setup Orchestration: 6-phase pipeline
//! (Environment -> Dependencies -> Sdk -> Validation -> Patching -> Building).
//!
//! Phases run synchronously and strictly in order. The first error marks the
//! run as failed and nothing after it executes.

pub mod executor;
pub mod state;

pub use executor::{build_command, run_build};
pub use state::{OrchestrationState, SetupPhase};

use crate::config::SetupConfig;
use crate::error::Result;
use crate::models::SetupPaths;
use crate::project::{ensure_makefile_line, validate_project};
use crate::sdk::ensure_sdk;
use crate::system::{self, env::export_environment, packages::install_dependencies, CommandRunner};

/// Banner printed after a successful run
pub const COMPLETION_MESSAGE: &str = "BL602 development environment setup complete.";

/// Drives one setup run through all phases.
pub struct SetupOrchestrator<'a> {
    runner: &'a dyn CommandRunner,
    config: SetupConfig,
    paths: SetupPaths,
    /// Prefix for apt-get, already dropped when running as root
    privilege: Option<String>,
    state: OrchestrationState,
}

impl<'a> SetupOrchestrator<'a> {
    /// Create an orchestrator in the Environment phase.
    pub fn new(runner: &'a dyn CommandRunner, config: SetupConfig, paths: SetupPaths) -> Self {
        let privilege = if system::is_root() {
            None
        } else {
            config.privilege_command.clone()
        };

        SetupOrchestrator {
            runner,
            config,
            paths,
            privilege,
            state: OrchestrationState::new(),
        }
    }

    pub fn state(&self) -> &OrchestrationState {
        &self.state
    }

    pub fn paths(&self) -> &SetupPaths {
        &self.paths
    }

    pub fn current_phase(&self) -> SetupPhase {
        self.state.phase
    }

    /// Run every phase. On failure the state records where it stopped.
    pub fn run(&mut self) -> Result<()> {
        match self.run_phases() {
            Ok(()) => {
                log::info!(
                    "[Setup] Finished in {:.1}s",
                    self.state.elapsed().as_secs_f64()
                );
                Ok(())
            }
            Err(e) => {
                log::error!(
                    "[Setup] Aborted during {} phase: {}",
                    self.state.phase.as_str(),
                    e
                );
                self.state.record_error(e.to_string());
                Err(e)
            }
        }
    }

    fn run_phases(&mut self) -> Result<()> {
        self.environment()?;

        self.state.transition_to(SetupPhase::Dependencies)?;
        self.dependencies()?;

        self.state.transition_to(SetupPhase::Sdk)?;
        self.sdk()?;

        self.state.transition_to(SetupPhase::Validation)?;
        validate_project(&self.paths)?;

        self.state.transition_to(SetupPhase::Patching)?;
        self.patch()?;

        self.state.transition_to(SetupPhase::Building)?;
        self.build()?;

        self.state.transition_to(SetupPhase::Completed)?;
        println!("{}", COMPLETION_MESSAGE);
        Ok(())
    }

    fn environment(&mut self) -> Result<()> {
        export_environment(&self.paths)?;
        println!("SDK_PATH: {}", self.paths.sdk.display());
        println!("TOOLCHAIN_PATH: {}", self.paths.toolchain.display());
        println!("PROJECT_PATH: {}", self.paths.project.display());
        Ok(())
    }

    fn dependencies(&mut self) -> Result<()> {
        if self.config.skip_install {
            log::info!("[Deps] Skipping host package installation");
            self.state.record_skipped(SetupPhase::Dependencies);
            return Ok(());
        }
        install_dependencies(
            self.runner,
            &self.config.packages,
            self.privilege.as_deref(),
        )
    }

    fn sdk(&mut self) -> Result<()> {
        let outcome = ensure_sdk(self.runner, &self.paths.sdk, &self.config.sdk_remote_url)?;
        log::info!("[Sdk] SDK {}", outcome.as_str());
        self.state.sdk_outcome = Some(outcome);
        Ok(())
    }

    fn patch(&mut self) -> Result<()> {
        let outcome = ensure_makefile_line(
            &self.paths.makefile(),
            &self.config.makefile_marker,
            &self.config.makefile_line,
            self.config.dry_run,
        )?;
        self.state.patch_outcome = Some(outcome);
        Ok(())
    }

    fn build(&mut self) -> Result<()> {
        if self.config.skip_build {
            log::info!("[Build] Skipping build");
            self.state.record_skipped(SetupPhase::Building);
            return Ok(());
        }
        run_build(self.runner, &self.config, &self.paths.project)
    }
}
