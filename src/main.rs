//! Provides the main entry point to the program.
use anyhow::Result;
use human_panic::setup_panic;
use ucsched::cli::run_cli;

fn main() -> Result<()> {
    // Display a friendly message and write a crash report on panics
    setup_panic!();

    run_cli()
}
