//! Wayfinder CLI - Query and edit campus waypoint graphs

mod cli;
mod display;

use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();

    let mut app = cli::WayfinderApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
