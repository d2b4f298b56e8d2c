//! SDK acquisition state machine against a scripted git.

mod common;

use bl602_setup::sdk::{ensure_sdk, inspect_sdk, SdkStatus};
use bl602_setup::{SdkOutcome, SetupError};
use common::{ScriptedRunner, SDK_URL};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_up_to_date_checkout_is_not_pulled() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let sdk = temp_dir.path().join("bl_iot_sdk");
    fs::create_dir_all(&sdk).unwrap();

    let runner = ScriptedRunner::git_checkout("a1b2c3", "a1b2c3");
    let outcome = ensure_sdk(&runner, &sdk, SDK_URL).expect("sync should succeed");

    assert_eq!(outcome, SdkOutcome::UpToDate);
    assert_eq!(runner.count("git fetch"), 1);
    assert_eq!(runner.count("git pull"), 0);
    assert!(!runner.any_starting_with("git clone"));
}

#[test]
fn test_stale_checkout_is_pulled_exactly_once() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let sdk = temp_dir.path().join("bl_iot_sdk");
    fs::create_dir_all(&sdk).unwrap();

    let runner = ScriptedRunner::git_checkout("a1b2c3", "d4e5f6");
    let outcome = ensure_sdk(&runner, &sdk, SDK_URL).expect("sync should succeed");

    assert_eq!(outcome, SdkOutcome::Pulled);
    assert_eq!(runner.count("git pull"), 1);

    // fetch happens before the comparison, pull after it
    let runs = runner.runs();
    assert_eq!(runs, vec!["git fetch".to_string(), "git pull".to_string()]);
}

#[test]
fn test_remote_mismatch_is_fatal_before_fetch() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let sdk = temp_dir.path().join("bl_iot_sdk");
    fs::create_dir_all(&sdk).unwrap();

    let runner = ScriptedRunner::git_checkout("a1b2c3", "a1b2c3").with_output(
        "git remote -v",
        "origin\thttps://github.com/someone/other_sdk.git (fetch)\n",
    );
    let result = ensure_sdk(&runner, &sdk, SDK_URL);

    match result {
        Err(SetupError::RemoteMismatch { expected, found }) => {
            assert_eq!(expected, SDK_URL);
            assert!(found.contains("other_sdk"));
        }
        other => panic!("expected remote mismatch, got {:?}", other),
    }
    assert_eq!(runner.count("git fetch"), 0);
    assert_eq!(runner.count("git pull"), 0);
}

#[test]
fn test_plain_directory_is_cloned() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let sdk = temp_dir.path().join("bl_iot_sdk");
    fs::create_dir_all(&sdk).unwrap();

    let runner = ScriptedRunner::new().with_probe("git rev-parse --is-inside-work-tree", false);
    assert_eq!(inspect_sdk(&runner, &sdk).unwrap(), SdkStatus::NotGitRepository);

    let outcome = ensure_sdk(&runner, &sdk, SDK_URL).expect("clone should succeed");
    assert_eq!(outcome, SdkOutcome::Cloned);

    let expected = format!("git clone {} {}", SDK_URL, sdk.display());
    assert_eq!(runner.count(&expected), 1);
    assert_eq!(runner.count("git fetch"), 0);
}

#[test]
fn test_fetch_failure_stops_sync() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let sdk = temp_dir.path().join("bl_iot_sdk");
    fs::create_dir_all(&sdk).unwrap();

    let runner = ScriptedRunner::git_checkout("a1b2c3", "d4e5f6").with_failure("git fetch", 128);
    let result = ensure_sdk(&runner, &sdk, SDK_URL);

    assert!(matches!(result, Err(SetupError::CommandFailed { .. })));
    assert_eq!(runner.count("git rev-parse @"), 0);
    assert_eq!(runner.count("git pull"), 0);
}

#[test]
fn test_missing_upstream_is_fatal() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let sdk = temp_dir.path().join("bl_iot_sdk");
    fs::create_dir_all(&sdk).unwrap();

    // detached HEAD / no tracking branch: rev-parse @{u} exits 128
    let runner =
        ScriptedRunner::git_checkout("a1b2c3", "a1b2c3").with_failure("git rev-parse @{u}", 128);
    assert!(ensure_sdk(&runner, &sdk, SDK_URL).is_err());
    assert_eq!(runner.count("git pull"), 0);
}

#[test]
fn test_absent_sdk_reports_clone_instructions() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let sdk = temp_dir.path().join("bl_iot_sdk");

    let runner = ScriptedRunner::new();
    let err = ensure_sdk(&runner, &sdk, SDK_URL).unwrap_err();

    assert!(runner.calls().is_empty(), "no git command for a missing SDK");
    let message = err.user_message();
    assert!(message.contains(&format!("git clone {} {}", SDK_URL, sdk.display())));
}
