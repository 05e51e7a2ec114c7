use axum::Json;
use axum::extract::State;
use diagnohero_store::HeartStatus;

use crate::error::ServerError;
use crate::session::Session;
use crate::state::AppState;

/// `POST /api/premium/upgrade`
pub(crate) async fn upgrade(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<HeartStatus>, ServerError> {
    let status = state
        .hearts
        .upgrade_to_premium(&session.user_id, state.now())
        .await?;
    Ok(Json(status))
}
