//! Bearer-token sessions.
//!
//! A request is authenticated once, by the [`Session`] extractor, and the
//! resolved user is handed to handlers explicitly.

use std::collections::HashMap;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use diagnohero_config::SessionEntry;
use tracing::debug;

use crate::error::ServerError;
use crate::state::AppState;

/// Maps a bearer token to a user id.
pub trait SessionResolver: Send + Sync {
    /// Returns the user id for `token`, or `None` if it is unknown.
    fn resolve(&self, token: &str) -> Option<String>;
}

/// Tokens fixed at startup from configuration.
#[derive(Debug, Default, Clone)]
pub struct StaticSessions {
    tokens: HashMap<String, String>,
}

impl StaticSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: &[SessionEntry]) -> Self {
        let mut sessions = Self::new();
        for entry in entries {
            sessions.insert(&entry.token, &entry.user_id);
        }
        sessions
    }

    pub fn insert(&mut self, token: impl Into<String>, user_id: impl Into<String>) {
        self.tokens.insert(token.into(), user_id.into());
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl SessionResolver for StaticSessions {
    fn resolve(&self, token: &str) -> Option<String> {
        self.tokens.get(token).cloned()
    }
}

/// Authenticated user of the current request.
///
/// The user row is provisioned on first sight, so handlers can assume it
/// exists.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for Session {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ServerError::Unauthorized)?;
        let Some(user_id) = state.sessions.resolve(token) else {
            debug!("unknown session token");
            return Err(ServerError::Unauthorized);
        };

        state.hearts.ensure_user(&user_id, state.now()).await?;
        Ok(Session { user_id })
    }
}
