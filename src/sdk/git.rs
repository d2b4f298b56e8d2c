//! Thin wrapper over the `git` command line for the SDK checkout.
//!
//! Every command runs with the repository directory as its working
//! directory and goes through a [`CommandRunner`], so the exact sequence of
//! git invocations is observable in tests.

use crate::error::Result;
use crate::system::{CommandRunner, CommandSpec};
use std::path::{Path, PathBuf};

/// git operations against one local directory
pub struct GitRepo<'a> {
    runner: &'a dyn CommandRunner,
    repo_path: PathBuf,
}

impl<'a> GitRepo<'a> {
    pub fn new(runner: &'a dyn CommandRunner, repo_path: impl AsRef<Path>) -> Self {
        GitRepo {
            runner,
            repo_path: repo_path.as_ref().to_path_buf(),
        }
    }

    fn git<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::new("git").args(args).current_dir(&self.repo_path)
    }

    /// Whether the directory is inside a git work tree.
    ///
    /// A missing `git` executable is an error, not `false`.
    pub fn is_work_tree(&self) -> Result<bool> {
        self.runner
            .probe(&self.git(["rev-parse", "--is-inside-work-tree"]))
    }

    /// Raw `git remote -v` listing
    pub fn remotes(&self) -> Result<String> {
        self.runner.output(&self.git(["remote", "-v"]))
    }

    pub fn fetch(&self) -> Result<()> {
        self.runner.run(&self.git(["fetch"]))
    }

    /// Resolve a revision (`@`, `@{u}`, a branch...) to its commit hash
    pub fn rev_parse(&self, rev: &str) -> Result<String> {
        let out = self.runner.output(&self.git(["rev-parse", rev]))?;
        Ok(out.trim().to_string())
    }

    /// Current HEAD commit hash
    pub fn head_commit(&self) -> Result<String> {
        self.rev_parse("@")
    }

    /// Commit hash of the upstream of the current branch
    pub fn upstream_commit(&self) -> Result<String> {
        self.rev_parse("@{u}")
    }

    pub fn pull(&self) -> Result<()> {
        self.runner.run(&self.git(["pull"]))
    }

    /// `git clone <url> <repo_path>`
    pub fn clone_into(&self, url: &str) -> Result<()> {
        let target = self.repo_path.to_string_lossy().into_owned();
        self.runner
            .run(&self.git(["clone".to_string(), url.to_string(), target]))
    }
}

/// Whether `git remote -v` output lists `url`.
///
/// Compared as a substring with any trailing `.git` dropped, so both
/// `https://host/x` and `https://host/x.git` remotes match either spelling.
pub fn remote_matches(remotes: &str, url: &str) -> bool {
    let url = url.trim().trim_end_matches('/');
    let needle = url.strip_suffix(".git").unwrap_or(url);
    !needle.is_empty() && remotes.contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REMOTES: &str = "origin\thttps://github.com/bouffalolab/bl_iot_sdk.git (fetch)\n\
                           origin\thttps://github.com/bouffalolab/bl_iot_sdk.git (push)\n";

    #[test]
    fn test_remote_matches_with_and_without_suffix() {
        assert!(remote_matches(
            REMOTES,
            "https://github.com/bouffalolab/bl_iot_sdk.git"
        ));
        assert!(remote_matches(REMOTES, "https://github.com/bouffalolab/bl_iot_sdk"));
        assert!(remote_matches(
            "origin\thttps://github.com/bouffalolab/bl_iot_sdk (fetch)\n",
            "https://github.com/bouffalolab/bl_iot_sdk.git"
        ));
    }

    #[test]
    fn test_remote_mismatch() {
        let fork = "origin\thttps://github.com/someone/bl_iot_sdk_fork.git (fetch)\n";
        assert!(!remote_matches(fork, "https://github.com/bouffalolab/bl_iot_sdk.git"));
        assert!(!remote_matches("", "https://github.com/bouffalolab/bl_iot_sdk.git"));
        assert!(!remote_matches(REMOTES, ""));
    }
}
