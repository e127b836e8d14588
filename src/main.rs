//! carms CLI entry point
//!
//! Parses arguments and dispatches to `cli::run`. Errors are printed to
//! stderr and the process exits with a non-zero status. Configuration,
//! storage and the HTTP server are all set up inside the CLI module.

use carms::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
