//! SQL database store.
//!
//! This module stores users, quiz answers, lection progress and study
//! sessions in SQL databases (PostgreSQL, MySQL, SQLite) through the SQLx
//! library. It is compiled with the `sql` feature (enabled by default).
//!
//! # Example
//!
//! ```ignore
//! use diagnohero_hearts::HeartPolicy;
//! use diagnohero_store::HeartService;
//! use diagnohero_store::sql::{SqlStore, SqlStoreConfig};
//!
//! let store = SqlStore::connect(
//!     SqlStoreConfig::new("sqlite:diagnohero.db").init_schema(true)
//! ).await?;
//!
//! let hearts = HeartService::new(store, HeartPolicy::default());
//! ```
//!
//! # Database Schema
//!
//! [`SqlStore::init_schema`] creates the tables below (PostgreSQL flavour
//! shown). All timestamps are unix seconds.
//!
//! ```sql
//! CREATE TABLE dh_users (
//!     user_id VARCHAR(255) PRIMARY KEY,
//!     hearts BIGINT NOT NULL,
//!     last_refill_at BIGINT NOT NULL,
//!     premium BOOLEAN NOT NULL DEFAULT FALSE,
//!     created_at BIGINT NOT NULL
//! );
//!
//! CREATE TABLE dh_quiz_answers (id, user_id, lection_id, correct, created_at);
//! CREATE TABLE dh_lection_progress (user_id, lection_id, progress, completed, last_interaction);
//! CREATE TABLE dh_study_sessions (id, user_id, title, description, scheduled_at,
//!                                 duration, completed, created_at, updated_at);
//! ```

mod backend;
mod config;
mod queries;

#[cfg(test)]
mod tests;

pub use backend::{DatabaseType, SqlStore};
pub use config::SqlStoreConfig;
