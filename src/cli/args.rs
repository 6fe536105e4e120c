//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use this config file
//! - `--debug`: Enable debug logging
//! - `--no-interactive`: Disable prompts
//! - `--quiet` / `-q`: Minimal output; implies `--no-interactive`

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::schedule::CheckFrequency;

/// nudge - in-app update notifier
#[derive(Parser, Debug)]
#[command(name = "nudge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the config file (default: <user config dir>/nudge/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; implies --no-interactive
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_interactive: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Determine if interactive mode is enabled.
    ///
    /// True unless `--no-interactive` or `--quiet` was set or stdin is not
    /// a terminal.
    pub fn interactive(&self) -> bool {
        if self.no_interactive || self.quiet {
            false
        } else {
            std::io::stdin().is_terminal()
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one update check against the configured endpoint
    Check {
        /// Override the configured check frequency for this run
        #[arg(long, value_enum)]
        frequency: Option<FrequencyArg>,
    },
}

/// Check frequency as a CLI value.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyArg {
    /// Check on every invocation
    Immediate,
    /// At most once a day
    Daily,
    /// At most once a week
    Weekly,
}

impl From<FrequencyArg> for CheckFrequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Immediate => CheckFrequency::Immediate,
            FrequencyArg::Daily => CheckFrequency::Daily,
            FrequencyArg::Weekly => CheckFrequency::Weekly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_check_with_flags() {
        let cli = Cli::try_parse_from([
            "nudge",
            "--debug",
            "--config",
            "/tmp/custom.toml",
            "check",
            "--frequency",
            "immediate",
        ])
        .unwrap();

        assert!(cli.debug);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/custom.toml")));
        let Command::Check { frequency } = cli.command;
        assert_eq!(frequency, Some(FrequencyArg::Immediate));
    }

    #[test]
    fn quiet_disables_prompts() {
        let cli = Cli::try_parse_from(["nudge", "--quiet", "check"]).unwrap();
        assert!(!cli.interactive());
    }

    #[test]
    fn frequency_arg_maps_to_check_frequency() {
        assert_eq!(
            CheckFrequency::from(FrequencyArg::Weekly),
            CheckFrequency::Weekly
        );
        assert_eq!(
            CheckFrequency::from(FrequencyArg::Immediate),
            CheckFrequency::Immediate
        );
    }
}
