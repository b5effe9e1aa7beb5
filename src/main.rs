// Allow dead code for items that are part of the public API but only used in tests
#![allow(dead_code)]
// Library re-exports the binary does not reach
#![allow(unused_imports)]

mod cmd;
mod config;
mod diagram;
mod json_schema;
mod metadata;
mod output;

use clap::Parser;
use cmd::Cli;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = cmd::run(cli) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

/// Logs go to stderr; stdout carries diagrams and JSON output
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("schema_diagram=debug,warn")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("schema_diagram=info,warn"))
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
