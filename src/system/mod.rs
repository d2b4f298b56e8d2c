/// System module: command execution, process environment, host packages

pub mod env;
pub mod packages;

use crate::error::{Result, SetupError};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// One external program invocation: program, arguments, working directory.
///
/// Arguments are passed to the program as-is, never through a shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.cwd {
            command.current_dir(dir);
        }
        command
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Seam between the setup phases and the operating system.
///
/// Production code uses [`SystemRunner`]; tests substitute a scripted runner
/// to observe exactly which commands a phase issues.
pub trait CommandRunner {
    /// Run with inherited stdio. Fails on spawn error or non-zero exit.
    fn run(&self, cmd: &CommandSpec) -> Result<()>;

    /// Run and capture stdout. Fails on spawn error or non-zero exit.
    fn output(&self, cmd: &CommandSpec) -> Result<String>;

    /// Run with output discarded and report whether it exited successfully.
    /// Fails only when the program cannot be started at all.
    fn probe(&self, cmd: &CommandSpec) -> Result<bool>;
}

/// Real process execution via `std::process::Command`
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        SystemRunner
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn spawn_error(cmd: &CommandSpec, e: io::Error) -> SetupError {
    if e.kind() == io::ErrorKind::NotFound {
        SetupError::CommandNotFound(cmd.program.clone())
    } else {
        SetupError::CommandFailed {
            cmd: cmd.to_string(),
            reason: format!("could not start process: {}", e),
        }
    }
}

fn status_error(cmd: &CommandSpec, status: ExitStatus, stderr: &str) -> SetupError {
    let mut reason = match status.code() {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    };
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        reason.push_str(": ");
        reason.push_str(stderr);
    }
    SetupError::CommandFailed {
        cmd: cmd.to_string(),
        reason,
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, cmd: &CommandSpec) -> Result<()> {
        log::debug!("[System] [RUN] {}", cmd);
        let status = cmd
            .to_command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| spawn_error(cmd, e))?;

        if status.success() {
            Ok(())
        } else {
            Err(status_error(cmd, status, ""))
        }
    }

    fn output(&self, cmd: &CommandSpec) -> Result<String> {
        log::debug!("[System] [OUTPUT] {}", cmd);
        let output = cmd
            .to_command()
            .stdin(Stdio::null())
            .output()
            .map_err(|e| spawn_error(cmd, e))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(status_error(cmd, output.status, &stderr));
        }
        if !stderr.trim().is_empty() {
            log::debug!("[System] [OUTPUT] stderr: {}", stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn probe(&self, cmd: &CommandSpec) -> Result<bool> {
        log::debug!("[System] [PROBE] {}", cmd);
        let status = cmd
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| spawn_error(cmd, e))?;
        Ok(status.success())
    }
}

/// Dry-run wrapper: mutating commands are logged, queries still execute.
///
/// Queries (`output`, `probe`) must run for real so that the SDK state
/// machine can still decide which branch it would take.
pub struct DryRunRunner<R: CommandRunner> {
    inner: R,
}

impl<R: CommandRunner> DryRunRunner<R> {
    pub fn new(inner: R) -> Self {
        DryRunRunner { inner }
    }
}

impl<R: CommandRunner> CommandRunner for DryRunRunner<R> {
    fn run(&self, cmd: &CommandSpec) -> Result<()> {
        log::info!("[DRY-RUN] would run: {}", cmd);
        Ok(())
    }

    fn output(&self, cmd: &CommandSpec) -> Result<String> {
        self.inner.output(cmd)
    }

    fn probe(&self, cmd: &CommandSpec) -> Result<bool> {
        self.inner.probe(cmd)
    }
}

/// True when the process already has root privileges
#[cfg(unix)]
pub fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
pub fn is_root() -> bool {
    false
}
