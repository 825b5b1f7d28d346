use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use gigbook_booking::{Booking, NewBooking};
use gigbook_shared::BookingId;
use gigbook_store::StatusUpdate;
use tracing::info;

use crate::{error::AppError, middleware::Claims, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", get(list_bookings).post(create_booking))
        .route("/v1/bookings/{id}/status", patch(update_status))
}

async fn list_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = state.bookings.list_bookings(claims.viewer()).await?;
    Ok(Json(bookings))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<NewBooking>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let booking = state.bookings.create_booking(claims.viewer(), &req).await?;
    info!("Booking {} created by {}", booking.id, claims.viewer());
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn update_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Booking>, AppError> {
    let booking = state
        .bookings
        .update_status(BookingId::Assigned(id), claims.viewer(), update)
        .await?;
    info!("Booking {} set to {} by {}", id, booking.status, claims.viewer());
    Ok(Json(booking))
}
