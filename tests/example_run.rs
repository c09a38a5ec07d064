//! Integration tests for the `example run` command.
use tempfile::tempdir;
use ucsched::cli::example::handle_example_run_command;
use ucsched::settings::Settings;

/// An integration test for the `example run` command.
#[test]
fn test_handle_example_run_command() {
    unsafe { std::env::set_var("UCSCHED_LOG_LEVEL", "off") };

    let tempdir = tempdir().unwrap();
    handle_example_run_command(
        "small_fleet",
        Some(tempdir.path()),
        false,
        Some(Settings::default()),
    )
    .unwrap();
    assert!(tempdir.path().join("schedule.csv").is_file());
    assert!(tempdir.path().join("commitment.csv").is_file());
}
