//! Makefile fixup: append the SDK make-scripts path when it is missing.
//!
//! The only idempotence guard is a substring test for the marker. No backup
//! is taken and the write is a plain append.

use crate::error::{Result, SetupError};
use crate::models::PatchOutcome;
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::Path;

fn contains_marker(content: &[u8], marker: &str) -> bool {
    let marker = marker.as_bytes();
    !marker.is_empty() && content.windows(marker.len()).any(|w| w == marker)
}

/// Bytes to append to `content`, or `None` when the marker is already there.
///
/// Exactly one line is added. A missing trailing newline on the existing
/// last line is supplied first so that line stays intact.
pub fn plan_append(content: &[u8], marker: &str, line: &str) -> Option<Vec<u8>> {
    if contains_marker(content, marker) {
        return None;
    }

    let mut tail = Vec::with_capacity(line.len() + 2);
    if !content.is_empty() && !content.ends_with(b"\n") {
        tail.push(b'\n');
    }
    tail.extend_from_slice(line.as_bytes());
    tail.push(b'\n');
    Some(tail)
}

/// Ensure `makefile` contains `marker`, appending `line` if it does not.
///
/// With `dry_run` the file is only read.
pub fn ensure_makefile_line(
    makefile: &Path,
    marker: &str,
    line: &str,
    dry_run: bool,
) -> Result<PatchOutcome> {
    let mut file = OpenOptions::new()
        .read(true)
        .append(!dry_run)
        .open(makefile)
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SetupError::MakefileMissing(makefile.to_path_buf())
            } else {
                SetupError::Io(e)
            }
        })?;

    let mut content = Vec::new();
    file.read_to_end(&mut content)?;

    let Some(tail) = plan_append(&content, marker, line) else {
        log::info!("[Patch] Makefile already defines {}", marker);
        return Ok(PatchOutcome::AlreadyPresent);
    };

    if dry_run {
        log::info!("[DRY-RUN] would append to {}: {}", makefile.display(), line);
        return Ok(PatchOutcome::WouldAppend);
    }

    log::info!("[Patch] Adding project path configuration to Makefile");
    file.write_all(&tail)?;
    file.flush()?;
    Ok(PatchOutcome::Appended)
}
