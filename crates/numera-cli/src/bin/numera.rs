//! Command-line front end of the numera solver.

use std::process;

use clap::Parser as _;
use numera_cli::Cli;

fn main() {
    better_panic::install();
    env_logger::init();

    let cli = Cli::parse();
    if let Err(err) = numera_cli::run(&cli) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}
