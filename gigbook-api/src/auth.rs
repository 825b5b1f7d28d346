use axum::{extract::State, routing::post, Json, Router};
use chrono::{Duration, Utc};
use gigbook_shared::UserId;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    middleware::Claims,
    state::{AppState, AuthConfig},
};

#[derive(Debug, Deserialize)]
struct DevTokenRequest {
    user_id: UserId,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/auth/dev-token", post(dev_token))
}

/// Signs a session token for `user`.
pub fn issue_token(auth: &AuthConfig, user: UserId) -> Result<String, AppError> {
    let claims = Claims {
        sub: user.0,
        exp: (Utc::now() + Duration::seconds(auth.expiration as i64)).timestamp() as usize,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(auth.secret.as_bytes()))
        .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}

async fn dev_token(
    State(state): State<AppState>,
    Json(req): Json<DevTokenRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if !state.auth.allow_dev_tokens {
        return Err(AppError::NotFoundError("Not found".to_string()));
    }

    let user = state
        .directory
        .find_user(req.user_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| AppError::NotFoundError(format!("User not found: {}", req.user_id)))?;

    tracing::info!("Issued development token for {}", user.id);
    Ok(Json(AuthResponse {
        token: issue_token(&state.auth, user.id)?,
    }))
}
