use k2dl_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    // Log to the state file; fall back to stderr so a read-only home never blocks a resume.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = Cli::run_from_args() {
        eprintln!("k2dl error: {:#}", err);
        std::process::exit(1);
    }
}
