use axum::Json;
use axum::extract::State;
use diagnohero_store::StudyStore;
use serde::Serialize;

use crate::error::ServerError;
use crate::session::Session;
use crate::state::AppState;

/// Learning summary of the current user.
#[derive(Debug, Serialize)]
pub(crate) struct Statistics {
    pub completed_lections: u64,
    /// Answers given inside the statistics window.
    pub total_quizzes: u64,
    /// Correct share of those answers, in percent.
    pub average_accuracy: u8,
    pub hearts: Option<u32>,
    pub max_hearts: u32,
    pub time_until_next_heart: Option<u64>,
    pub premium: bool,
}

/// `GET /api/statistics`
pub(crate) async fn get_statistics(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Statistics>, ServerError> {
    let now = state.now();
    let since = now.saturating_sub(i64::try_from(state.stats_window_secs).unwrap_or(i64::MAX));

    let status = state.hearts.hearts(&session.user_id, now).await?;
    let counts = state
        .store
        .answer_counts_since(&session.user_id, since)
        .await?;
    let completed_lections = state.store.completed_lections(&session.user_id).await?;

    Ok(Json(Statistics {
        completed_lections,
        total_quizzes: counts.total,
        average_accuracy: counts.accuracy_percent(),
        hearts: status.hearts.count(),
        max_hearts: status.max_hearts,
        time_until_next_heart: status.next_heart_in,
        premium: status.premium,
    }))
}
