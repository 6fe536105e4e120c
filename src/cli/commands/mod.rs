//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! Handlers parse nothing themselves; they receive typed options derived
//! from the CLI flags and call into the engine. Network-bound commands are
//! async inside and use `Runtime::block_on` so the CLI surface stays
//! synchronous.

mod check;

pub use check::{check, CheckOptions};

use anyhow::Result;

use super::args::{Cli, Command};
use crate::ui::output::Verbosity;

/// Dispatch a parsed CLI invocation to its handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    let interactive = cli.interactive();
    let verbosity = Verbosity::from_quiet(cli.quiet);

    match cli.command {
        Command::Check { frequency } => check(CheckOptions {
            config_path: cli.config,
            frequency: frequency.map(Into::into),
            interactive,
            verbosity,
        }),
    }
}
