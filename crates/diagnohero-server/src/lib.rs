//! DiagnoHero HTTP service.
//!
//! Serves the hearts counter, quiz answers, lection progress, statistics
//! and the study-session planner over JSON. Requests authenticate with a
//! bearer token that maps to a user id; the user row is created on first
//! use.
//!
//! This module exposes the server implementation for use by integration
//! tests and embedding.

pub mod cli;
mod error;
mod handler;
mod server;
mod session;
mod state;

pub use cli::ServerArgs;
pub use error::ServerError;
pub use server::{
    DEFAULT_SHUTDOWN_TIMEOUT, build_router, open_store, run, run_with_shutdown, serve,
};
pub use session::{Session, SessionResolver, StaticSessions};
pub use state::{AppState, Clock};
pub use tokio_util::sync::CancellationToken;
