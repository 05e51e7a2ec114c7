//! Unified diagnohero CLI.
//!
//! This binary provides a unified interface to all diagnohero components:
//! - `diagnohero serve` - Run the HTTP service
//! - `diagnohero admin` - Manage users and hearts (SQL backend)
//!
//! Each subcommand can also be run as a standalone binary.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// DiagnoHero unified CLI.
#[derive(Parser)]
#[command(
    name = "diagnohero",
    version,
    about = "Quiz hearts, progress and study scheduling service",
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service.
    #[command(name = "serve", alias = "server")]
    Serve(Box<diagnohero_server::ServerArgs>),

    /// Manage users and hearts (SQL backend).
    #[command(name = "admin")]
    Admin(diagnohero_store::AdminArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => diagnohero_server::cli::run(*args).await,
        Commands::Admin(args) => diagnohero_store::cli::run(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
