//! Request handlers.
//!
//! Every `/api` handler takes a [`Session`](crate::session::Session), so a
//! missing or unknown token is rejected before the handler body runs.

pub(crate) mod hearts;
pub(crate) mod lections;
pub(crate) mod premium;
pub(crate) mod sessions;
pub(crate) mod statistics;

use axum::Json;
use serde_json::{Value, json};

/// Liveness probe; needs no session.
pub(crate) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
