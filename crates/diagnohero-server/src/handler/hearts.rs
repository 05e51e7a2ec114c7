//! Heart counter of the current user.

use axum::Json;
use axum::extract::State;
use diagnohero_store::HeartStatus;

use crate::error::ServerError;
use crate::session::Session;
use crate::state::AppState;

/// `GET /api/hearts`
pub(crate) async fn get_hearts(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<HeartStatus>, ServerError> {
    let status = state.hearts.hearts(&session.user_id, state.now()).await?;
    Ok(Json(status))
}
