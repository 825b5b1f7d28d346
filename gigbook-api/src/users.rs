use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use gigbook_shared::{User, UserId};

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/users/{id}", get(get_user))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, AppError> {
    let id = UserId(id);
    state
        .directory
        .find_user(id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError(format!("User not found: {}", id)))
}
