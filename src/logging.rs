//! logging
//!
//! Debug log stream behind the `--debug` flag.
//!
//! The library logs through the `log` facade; nothing is printed unless
//! the binary installs a logger. `--debug` installs a terminal logger on
//! stderr so diagnostic output never mixes with the prompt text on stdout.

use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Install the terminal logger.
///
/// With `debug` false the logger is installed filtered off. Calling this
/// twice is harmless; the second install attempt is ignored.
pub fn init(debug: bool) {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("nudge")
        .build();

    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Off
    };

    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}
