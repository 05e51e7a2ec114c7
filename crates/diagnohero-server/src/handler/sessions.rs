//! Study session planner.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use diagnohero_store::{NewStudySession, StoreError, StudySession, StudyStore};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::error::ServerError;
use crate::session::Session;
use crate::state::AppState;

/// `GET /api/study-sessions`
pub(crate) async fn list(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<StudySession>>, ServerError> {
    Ok(Json(state.store.list_sessions(&session.user_id).await?))
}

/// `POST /api/study-sessions`
pub(crate) async fn create(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<NewStudySession>,
) -> Result<(StatusCode, Json<StudySession>), ServerError> {
    let new = body.normalized()?;
    let created = state
        .store
        .add_session(&session.user_id, new, state.now())
        .await?;
    info!(user_id = %session.user_id, id = created.id, "study session scheduled");
    Ok((StatusCode::CREATED, Json(created)))
}

/// `DELETE /api/study-sessions/{id}`
pub(crate) async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServerError> {
    if !state.store.delete_session(&session.user_id, id).await? {
        return Err(StoreError::NotFound.into());
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompleteRequest {
    #[serde(default = "default_completed")]
    pub completed: bool,
}

fn default_completed() -> bool {
    true
}

/// `POST /api/study-sessions/{id}/complete`
pub(crate) async fn complete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Json(body): Json<CompleteRequest>,
) -> Result<Json<Value>, ServerError> {
    let found = state
        .store
        .set_session_completed(&session.user_id, id, body.completed, state.now())
        .await?;
    if !found {
        return Err(StoreError::NotFound.into());
    }
    Ok(Json(json!({ "id": id, "completed": body.completed })))
}
