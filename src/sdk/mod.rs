//! Vendor SDK acquisition and update.
//!
//! The SDK directory is in one of three states:
//!
//! - **Absent**: fatal, the user is told how to clone it manually
//! - **Git work tree**: remote must match; fetch, then pull only if the
//!   local commit differs from upstream
//! - **Present but not a work tree**: a fresh clone is made

pub mod git;

use crate::error::{Result, SetupError};
use crate::models::SdkOutcome;
use crate::system::CommandRunner;
use git::{remote_matches, GitRepo};
use std::path::Path;

/// Observed state of the SDK directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdkStatus {
    Absent,
    GitRepository,
    NotGitRepository,
}

/// Classify the SDK directory. Needs `git` for directories that exist.
pub fn inspect_sdk(runner: &dyn CommandRunner, sdk_path: &Path) -> Result<SdkStatus> {
    if !sdk_path.is_dir() {
        return Ok(SdkStatus::Absent);
    }

    if GitRepo::new(runner, sdk_path).is_work_tree()? {
        Ok(SdkStatus::GitRepository)
    } else {
        Ok(SdkStatus::NotGitRepository)
    }
}

/// Bring the SDK at `sdk_path` up to date with `remote_url`.
pub fn ensure_sdk(
    runner: &dyn CommandRunner,
    sdk_path: &Path,
    remote_url: &str,
) -> Result<SdkOutcome> {
    let repo = GitRepo::new(runner, sdk_path);

    match inspect_sdk(runner, sdk_path)? {
        SdkStatus::Absent => {
            log::error!("[Sdk] SDK not installed at {}", sdk_path.display());
            Err(SetupError::SdkMissing {
                path: sdk_path.to_path_buf(),
                clone_url: remote_url.to_string(),
            })
        }
        SdkStatus::GitRepository => {
            log::info!("[Sdk] {} is a git repository", sdk_path.display());
            update_checkout(&repo, remote_url)
        }
        SdkStatus::NotGitRepository => {
            log::info!(
                "[Sdk] {} is not a git repository, cloning {}",
                sdk_path.display(),
                remote_url
            );
            repo.clone_into(remote_url)?;
            log::info!("[Sdk] Clone complete");
            Ok(SdkOutcome::Cloned)
        }
    }
}

fn update_checkout(repo: &GitRepo<'_>, remote_url: &str) -> Result<SdkOutcome> {
    let remotes = repo.remotes()?;
    if !remote_matches(&remotes, remote_url) {
        log::error!("[Sdk] Remote does not point to {}", remote_url);
        return Err(SetupError::RemoteMismatch {
            expected: remote_url.to_string(),
            found: remotes,
        });
    }
    log::info!("[Sdk] Remote is correct");

    repo.fetch()?;

    let local = repo.head_commit()?;
    let upstream = repo.upstream_commit()?;
    log::debug!("[Sdk] local={} upstream={}", local, upstream);

    if local == upstream {
        log::info!("[Sdk] SDK is already up to date");
        Ok(SdkOutcome::UpToDate)
    } else {
        log::info!("[Sdk] SDK is behind upstream, pulling latest changes");
        repo.pull()?;
        Ok(SdkOutcome::Pulled)
    }
}
