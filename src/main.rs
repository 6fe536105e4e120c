//! nudge binary entry point.

fn main() {
    if let Err(error) = nudge::cli::run() {
        nudge::ui::output::error(format!("{:#}", error));
        std::process::exit(1);
    }
}
