//! Logging backend for the `log` facade.
//!
//! Every record goes to stderr. When a log directory is configured, the same
//! lines are appended to a per-session file `setup-<timestamp>.log` so a
//! failed setup can be inspected afterwards.
//!
//! ```text
//! log::info!() ... log::error!()
//!     |
//! [LogCollector]
//!     +--> stderr
//!     +--> <log_dir>/setup-YYYYmmdd-HHMMSS.log   (optional)
//! ```

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Ensure the logs directory exists
pub fn ensure_logs_dir_exists(log_dir: &Path) -> Result<(), String> {
    std::fs::create_dir_all(log_dir)
        .map_err(|e| format!("Failed to create logs directory: {}", e))?;
    Ok(())
}

/// Session log file name for the current local time
pub fn session_log_name() -> String {
    format!("setup-{}.log", Local::now().format("%Y%m%d-%H%M%S"))
}

/// Render one log line: `HH:MM:SS.mmm LEVEL message`
pub fn format_line(level: Level, message: &str) -> String {
    format!(
        "{} {:<5} {}",
        Local::now().format("%H:%M:%S%.3f"),
        level,
        message
    )
}

/// `log::Log` implementation writing to stderr and an optional session file
pub struct LogCollector {
    level: LevelFilter,
    file: Option<Mutex<File>>,
    log_path: Option<PathBuf>,
}

impl LogCollector {
    /// Create a collector. With `log_dir`, the session file is created immediately.
    pub fn new(level: LevelFilter, log_dir: Option<&Path>) -> Result<Self, String> {
        let (file, log_path) = match log_dir {
            Some(dir) => {
                ensure_logs_dir_exists(dir)?;
                let path = dir.join(session_log_name());
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .map_err(|e| format!("Failed to open log file {}: {}", path.display(), e))?;
                (Some(Mutex::new(file)), Some(path))
            }
            None => (None, None),
        };

        Ok(LogCollector {
            level,
            file,
            log_path,
        })
    }

    /// Path of the session log file, if one is being written
    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    /// Register as the global logger for the `log` crate.
    pub fn install(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self)).map(|()| log::set_max_level(level))
    }
}

impl Log for LogCollector {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format_line(record.level(), &record.args().to_string());
        eprintln!("{}", line);

        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                // Disk logging is best-effort; stderr already has the line
                let _ = writeln!(file, "{}", line);
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_line_contains_level_and_message() {
        let line = format_line(Level::Warn, "[Sdk] remote mismatch");
        assert!(line.contains("WARN"));
        assert!(line.ends_with("[Sdk] remote mismatch"));
    }

    #[test]
    fn test_session_log_name() {
        let name = session_log_name();
        assert!(name.starts_with("setup-"));
        assert!(name.ends_with(".log"));
    }

    #[test]
    fn test_records_written_to_session_file() {
        let temp = TempDir::new().unwrap();
        let log_dir = temp.path().join("logs");
        let collector = LogCollector::new(LevelFilter::Info, Some(&log_dir)).unwrap();
        let path = collector.log_path().unwrap().to_path_buf();
        assert!(path.exists(), "session file is created up front");

        collector.log(
            &Record::builder()
                .args(format_args!("[Deps] Installation complete"))
                .level(Level::Info)
                .target("bl602_setup")
                .build(),
        );
        collector.log(
            &Record::builder()
                .args(format_args!("filtered out"))
                .level(Level::Debug)
                .target("bl602_setup")
                .build(),
        );
        collector.flush();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[Deps] Installation complete"));
        assert!(!content.contains("filtered out"));
    }

    #[test]
    fn test_install_registers_global_logger() {
        let collector = LogCollector::new(LevelFilter::Info, None).unwrap();
        collector.install().expect("first logger registration succeeds");
        assert_eq!(log::max_level(), LevelFilter::Info);
        log::info!("[Test] global logger installed");
    }

    #[test]
    fn test_stderr_only_collector() {
        let collector = LogCollector::new(LevelFilter::Debug, None).unwrap();
        assert!(collector.log_path().is_none());
        assert!(collector.enabled(&Metadata::builder().level(Level::Debug).build()));
    }
}
