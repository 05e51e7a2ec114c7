//! DiagnoHero store administration binary.

use std::process::ExitCode;

use clap::Parser;
use diagnohero_store::{AdminArgs, cli};

#[tokio::main]
async fn main() -> ExitCode {
    let args = AdminArgs::parse();

    match cli::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
