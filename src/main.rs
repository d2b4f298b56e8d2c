use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;

use bl602_setup::config::loader::{load_effective_config, ConfigSource};
use bl602_setup::{
    CommandRunner, DryRunRunner, LogCollector, SetupConfig, SetupError, SetupOrchestrator,
    SetupPaths, SystemRunner,
};

/// Prepare the BL602 build environment and build the sample project.
#[derive(Parser, Debug)]
#[command(name = "bl602_setup", version, about)]
struct Cli {
    /// Directory the SDK/toolchain/project offsets are resolved against
    #[arg(long, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Settings file (JSON); defaults to ~/.config/bl602-setup/settings.json if present
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the SDK clone URL
    #[arg(long, value_name = "URL")]
    sdk_remote: Option<String>,

    /// Do not install host packages
    #[arg(long)]
    skip_install: bool,

    /// Stop after patching the Makefile
    #[arg(long)]
    skip_build: bool,

    /// Parallel build jobs (default: logical CPU count)
    #[arg(long, short = 'j', value_name = "N")]
    jobs: Option<usize>,

    /// Log mutating commands instead of running them
    #[arg(long)]
    dry_run: bool,

    /// Also write a session log file into this directory
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Print the effective settings as JSON and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded settings
    fn apply(&self, config: &mut SetupConfig) {
        if let Some(dir) = &self.base_dir {
            config.base_dir = Some(dir.clone());
        }
        if let Some(url) = &self.sdk_remote {
            config.sdk_remote_url = url.clone();
        }
        if let Some(jobs) = self.jobs {
            config.jobs = Some(jobs);
        }
        if let Some(dir) = &self.log_dir {
            config.log_dir = Some(dir.clone());
        }
        config.skip_install |= self.skip_install;
        config.skip_build |= self.skip_build;
        config.dry_run |= self.dry_run;
    }
}

fn init_logging(level: LevelFilter, log_dir: Option<&std::path::Path>) -> anyhow::Result<()> {
    let collector = LogCollector::new(level, log_dir).map_err(anyhow::Error::msg)?;
    if let Some(path) = collector.log_path() {
        eprintln!("[Main] Session log: {}", path.display());
    }
    collector
        .install()
        .context("Failed to register the global logger")?;
    Ok(())
}

fn log_config_source(source: &ConfigSource) {
    match source {
        ConfigSource::Defaults => log::debug!("[Config] {}", source.describe()),
        _ => log::info!("[Config] {}", source.describe()),
    }
}

fn run(cli: Cli) -> Result<(), SetupError> {
    let (mut config, source) = load_effective_config(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(e) = init_logging(level, config.log_dir.as_deref()) {
        eprintln!("[Main] WARNING: {:#}", e);
    }
    log_config_source(&source);

    if cli.print_config {
        let json = serde_json::to_string_pretty(&config)
            .map_err(|e| SetupError::Config(e.into()))?;
        println!("{}", json);
        return Ok(());
    }

    let paths = SetupPaths::from_config(&config)?;

    let runner: Box<dyn CommandRunner> = if config.dry_run {
        log::info!("[Main] Dry run: no packages, git updates, Makefile writes or builds");
        Box::new(DryRunRunner::new(SystemRunner::new()))
    } else {
        Box::new(SystemRunner::new())
    };

    let mut orchestrator = SetupOrchestrator::new(runner.as_ref(), config, paths);
    orchestrator.run()
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version are not failures
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(1);
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e.user_message());
            log::logger().flush();
            ExitCode::from(e.exit_code())
        }
    }
}
