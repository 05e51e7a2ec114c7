//! Quiz answers and lection progress.

use axum::Json;
use axum::extract::{Path, State};
use diagnohero_store::{LectionProgress, QuizAnswer, SpendOutcome, StoreError, StudyStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ServerError;
use crate::session::Session;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerRequest {
    pub correct: bool,
}

/// Whether the answer counted, and the hearts left afterwards.
#[derive(Debug, Serialize)]
pub(crate) struct AnswerResponse {
    pub allowed: bool,
    /// `null` for premium accounts.
    pub hearts: Option<u32>,
    pub next_heart_in: Option<u64>,
    pub premium: bool,
}

/// `POST /api/lections/{id}/answers`
///
/// An incorrect answer costs a heart. Without hearts left the answer is
/// refused with `allowed: false` and not recorded. A failure to record an
/// accepted answer is logged and does not fail the request.
pub(crate) async fn submit_answer(
    State(state): State<AppState>,
    session: Session,
    Path(lection_id): Path<String>,
    Json(body): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, ServerError> {
    let now = state.now();
    let user_id = session.user_id;

    let response = if body.correct {
        let status = state.hearts.hearts(&user_id, now).await?;
        AnswerResponse {
            allowed: status.hearts.can_attempt(),
            hearts: status.hearts.count(),
            next_heart_in: status.next_heart_in,
            premium: status.premium,
        }
    } else {
        let outcome = state.hearts.spend_heart(&user_id, now).await?;
        AnswerResponse {
            allowed: outcome.allowed(),
            hearts: outcome.hearts(),
            next_heart_in: outcome.next_heart_in(),
            premium: matches!(outcome, SpendOutcome::Unlimited),
        }
    };

    if !response.allowed {
        debug!(
            user_id = %user_id,
            lection_id = %lection_id,
            "answer refused, no hearts left"
        );
        return Ok(Json(response));
    }

    // The heart is already spent at this point; a failed log write is not
    // reported to the client.
    let answer = QuizAnswer {
        user_id: user_id.clone(),
        lection_id,
        correct: body.correct,
        created_at: now,
    };
    match state.store.record_answer(answer).await {
        Ok(()) => diagnohero_metrics::record_answer(body.correct),
        Err(e) => {
            diagnohero_metrics::record_error(e.error_type());
            warn!(user_id = %user_id, error = %e, "failed to record answer");
        }
    }

    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgressRequest {
    pub progress: u32,
    #[serde(default)]
    pub completed: bool,
}

/// `POST /api/lections/{id}/progress`
pub(crate) async fn update_progress(
    State(state): State<AppState>,
    session: Session,
    Path(lection_id): Path<String>,
    Json(body): Json<ProgressRequest>,
) -> Result<Json<LectionProgress>, ServerError> {
    let progress = u8::try_from(body.progress)
        .ok()
        .filter(|p| *p <= 100)
        .ok_or_else(|| ServerError::BadRequest("progress must be between 0 and 100".into()))?;

    let entry = LectionProgress {
        user_id: session.user_id,
        lection_id,
        progress,
        completed: body.completed,
        last_interaction: state.now(),
    };
    entry.validate()?;
    state.store.upsert_progress(&entry).await?;

    Ok(Json(entry))
}

/// `GET /api/lections/{id}/progress`
pub(crate) async fn get_progress(
    State(state): State<AppState>,
    session: Session,
    Path(lection_id): Path<String>,
) -> Result<Json<LectionProgress>, ServerError> {
    state
        .store
        .find_progress(&session.user_id, &lection_id)
        .await?
        .map(Json)
        .ok_or(StoreError::NotFound.into())
}
