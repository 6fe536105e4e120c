//! cli
//!
//! Command-line interface layer for nudge.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//! - Does NOT run check cycles directly; that is the engine's job
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, installs the debug
//! log stream, and dispatches to [`commands`], which wire the production
//! collaborators into [`crate::engine::UpdateChecker`].

pub mod args;
pub mod commands;

pub use args::{Cli, Command};

use anyhow::Result;

use crate::logging;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    logging::init(cli.debug);

    commands::dispatch(cli)
}
