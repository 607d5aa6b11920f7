// src/main.rs
mod app;
mod config;
mod kubeconfig;
mod types;
mod utils;

use clap::Parser;
use types::Args;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Handle any errors that occurred during execution
    if let Err(err) = app::run(&args) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
