//! Host dependency installation through apt-get.

use crate::error::{Result, SetupError};
use crate::system::{CommandRunner, CommandSpec};
use once_cell::sync::Lazy;
use regex::Regex;

// Debian policy: lowercase alphanumerics plus + - . , at least two chars,
// starting with an alphanumeric
static PACKAGE_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9+.\-]+$").expect("Invalid package name regex"));

/// Reject package names that are not plain Debian package names.
pub fn validate_package_name(name: &str) -> Result<()> {
    if PACKAGE_NAME_REGEX.is_match(name) {
        Ok(())
    } else {
        Err(SetupError::InvalidInput(format!(
            "Package name contains invalid characters: '{}'. Only lowercase alphanumerics, '+', '-' and '.' are allowed.",
            name
        )))
    }
}

/// Build an apt-get command, prefixed with the privilege command when given.
fn apt_get(privilege: Option<&str>, args: &[&str]) -> CommandSpec {
    match privilege {
        Some(prefix) => CommandSpec::new(prefix).arg("apt-get").args(args.iter().copied()),
        None => CommandSpec::new("apt-get").args(args.iter().copied()),
    }
}

/// The commands that install `packages`: index update, then install.
///
/// Every name is validated before any command is built.
pub fn install_commands(packages: &[String], privilege: Option<&str>) -> Result<Vec<CommandSpec>> {
    for name in packages {
        validate_package_name(name)?;
    }

    let mut commands = vec![apt_get(privilege, &["update"])];
    if !packages.is_empty() {
        let mut install = apt_get(privilege, &["install", "-y"]);
        install = install.args(packages.iter().cloned());
        commands.push(install);
    }
    Ok(commands)
}

/// Install the host packages, stopping at the first failing command.
pub fn install_dependencies(
    runner: &dyn CommandRunner,
    packages: &[String],
    privilege: Option<&str>,
) -> Result<()> {
    log::info!("[Deps] Installing host tools: {}", packages.join(", "));

    for cmd in install_commands(packages, privilege)? {
        runner.run(&cmd).map_err(|e| {
            log::error!("[Deps] Installation failed: {}", e);
            e
        })?;
    }

    log::info!("[Deps] Installation complete");
    Ok(())
}
