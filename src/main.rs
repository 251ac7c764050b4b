use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fsds_email::cli::Args;
use fsds_email::{app, ui, Error};

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    match app::run(args) {
        Ok(()) => {}
        Err(Error::Cancelled) => process::exit(1),
        Err(err) => {
            ui::print_error(&err);
            process::exit(1);
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
