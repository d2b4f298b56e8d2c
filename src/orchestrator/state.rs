//! Setup State Management and Phase Tracking
//!
//! - `SetupPhase`: discrete phases of a setup run, with a fixed transition table
//! - `OrchestrationState`: current phase plus what each finished phase produced

use std::time::{Duration, Instant};

use crate::error::SetupError;
use crate::models::{PatchOutcome, SdkOutcome};

/// Setup phase enumeration - discrete states in the setup lifecycle.
///
/// Phases run strictly in declaration order; any phase may fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetupPhase {
    /// Path resolution and environment export
    Environment,

    /// Host package installation
    Dependencies,

    /// SDK clone / fetch / pull
    Sdk,

    /// Project, Makefile and project.mk existence checks
    Validation,

    /// Makefile fixup
    Patching,

    /// make invocation
    Building,

    /// Setup finished successfully
    Completed,

    /// Setup aborted; terminal
    Failed,
}

impl SetupPhase {
    /// Get the human-readable name for this phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            SetupPhase::Environment => "environment",
            SetupPhase::Dependencies => "dependencies",
            SetupPhase::Sdk => "sdk",
            SetupPhase::Validation => "validation",
            SetupPhase::Patching => "patching",
            SetupPhase::Building => "building",
            SetupPhase::Completed => "completed",
            SetupPhase::Failed => "failed",
        }
    }

    /// Get all valid phase transitions FROM this phase.
    pub fn valid_next_phases(&self) -> Vec<SetupPhase> {
        match self {
            SetupPhase::Environment => vec![SetupPhase::Dependencies, SetupPhase::Failed],
            SetupPhase::Dependencies => vec![SetupPhase::Sdk, SetupPhase::Failed],
            SetupPhase::Sdk => vec![SetupPhase::Validation, SetupPhase::Failed],
            SetupPhase::Validation => vec![SetupPhase::Patching, SetupPhase::Failed],
            SetupPhase::Patching => vec![SetupPhase::Building, SetupPhase::Failed],
            SetupPhase::Building => vec![SetupPhase::Completed, SetupPhase::Failed],
            SetupPhase::Completed => vec![],
            SetupPhase::Failed => vec![],
        }
    }

    /// Check if a transition to the given phase is valid.
    pub fn can_transition_to(&self, next: SetupPhase) -> bool {
        self.valid_next_phases().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SetupPhase::Completed | SetupPhase::Failed)
    }
}

/// Snapshot of a setup run.
#[derive(Debug, Clone)]
pub struct OrchestrationState {
    pub phase: SetupPhase,

    /// Phase that was running when the run failed
    pub failed_in: Option<SetupPhase>,

    pub sdk_outcome: Option<SdkOutcome>,
    pub patch_outcome: Option<PatchOutcome>,

    /// Phases that were skipped by configuration
    pub skipped: Vec<SetupPhase>,

    pub start_time: Instant,

    /// Error message if the run failed
    pub error: Option<String>,
}

impl OrchestrationState {
    pub fn new() -> Self {
        OrchestrationState {
            phase: SetupPhase::Environment,
            failed_in: None,
            sdk_outcome: None,
            patch_outcome: None,
            skipped: Vec::new(),
            start_time: Instant::now(),
            error: None,
        }
    }

    /// Attempt to transition to the next phase.
    pub fn transition_to(&mut self, next_phase: SetupPhase) -> Result<(), SetupError> {
        if !self.phase.can_transition_to(next_phase) {
            return Err(SetupError::InvalidTransition {
                from: self.phase.as_str().to_string(),
                to: next_phase.as_str().to_string(),
            });
        }
        self.phase = next_phase;
        Ok(())
    }

    /// Record an error and mark the run as failed.
    pub fn record_error(&mut self, error: String) {
        if !self.phase.is_terminal() {
            self.failed_in = Some(self.phase);
        }
        self.error = Some(error);
        self.phase = SetupPhase::Failed;
    }

    pub fn record_skipped(&mut self, phase: SetupPhase) {
        self.skipped.push(phase);
    }

    /// Get time elapsed since the run started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Default for OrchestrationState {
    fn default() -> Self {
        Self::new()
    }
}
