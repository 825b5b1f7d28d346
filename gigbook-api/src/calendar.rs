use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::NaiveDate;
use gigbook_calendar::{
    BookingFilterView, CalendarContext, CalendarEvent, CalendarProjector, CalendarView, ToggleKind, ViewWindow,
};
use gigbook_shared::UserId;
use serde::{Deserialize, Serialize};

use crate::{error::AppError, middleware::Claims, state::AppState};

#[derive(Debug, Deserialize)]
struct CalendarQuery {
    view: Option<CalendarView>,
    date: Option<NaiveDate>,
    include_sent: Option<bool>,
    include_received: Option<bool>,
}

#[derive(Debug, Serialize)]
struct ToggleState {
    kind: &'static str,
    label: String,
    on: bool,
}

#[derive(Debug, Serialize)]
struct CalendarResponse {
    owner_id: UserId,
    view: CalendarView,
    focus: NaiveDate,
    start: NaiveDate,
    end: NaiveDate,
    toggles: Vec<ToggleState>,
    events: Vec<CalendarEvent>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/calendar/{owner_id}", get(calendar))
}

/// The owner's calendar as the viewer is allowed to see it.
async fn calendar(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(owner_id): Path<i64>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    let viewer = claims.viewer();
    let owner = UserId(owner_id);
    let context = CalendarContext::new(viewer, owner);

    let mut filter = BookingFilterView::new(context);
    if let Some(on) = query.include_sent {
        filter.set_toggle(ToggleKind::Sent, on);
    }
    if let Some(on) = query.include_received {
        filter.set_toggle(ToggleKind::Received, on);
    }

    let window = ViewWindow::new(
        query.view.unwrap_or(state.calendar.default_view),
        query.date.unwrap_or_else(|| state.clock.today()),
    )
    .with_week_start(state.calendar.week_starts_on);

    let bookings = state.bookings.list_bookings(viewer).await?;
    let visible: Vec<_> = filter.visible(&bookings).into_iter().cloned().collect();
    let projection = CalendarProjector::project(&visible, window);

    let owner_name = state
        .directory
        .find_user(owner)
        .await
        .ok()
        .flatten()
        .map(|u| u.display_name)
        .unwrap_or_else(|| "Unknown user".to_string());
    let toggles = filter
        .applicable_toggles()
        .iter()
        .map(|kind| ToggleState {
            kind: match kind {
                ToggleKind::Sent => "sent",
                ToggleKind::Received => "received",
            },
            label: kind.label(&context, &owner_name),
            on: filter.toggles().get(*kind),
        })
        .collect();

    let range = window.range();
    Ok(Json(CalendarResponse {
        owner_id: owner,
        view: window.view,
        focus: window.focus,
        start: range.start,
        end: range.end,
        toggles,
        events: projection.visible().cloned().collect(),
    }))
}
