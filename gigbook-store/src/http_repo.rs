use crate::app_config::ClientConfig;
use crate::repository::{BookingApi, StatusUpdate};
use async_trait::async_trait;
use gigbook_booking::{Booking, NewBooking};
use gigbook_core::{BookingError, CoreResult};
use gigbook_shared::{BookingId, UserId};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

/// Booking API reached over HTTP.
///
/// The server derives the acting user from the bearer token, so the
/// `viewer`/`actor` arguments are only used to shape local errors.
#[derive(Clone)]
pub struct HttpBookingApi {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    status: Option<String>,
}

impl HttpBookingApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration, token: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: base_url.into(),
            token,
            client,
        }
    }

    pub fn from_config(config: &ClientConfig, token: Option<String>) -> Self {
        Self::new(
            config.base_url.clone(),
            Duration::from_millis(config.timeout_ms),
            token,
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn read<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        target: Option<(BookingId, UserId, &str)>,
    ) -> CoreResult<T> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| BookingError::network(format!("invalid response body: {}", e)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| BookingError::network(format!("failed reading error body: {}", e)))?;
        let parsed = serde_json::from_slice::<ErrorBody>(&body).ok();
        let message = parsed
            .as_ref()
            .map(|b| b.error.clone())
            .unwrap_or_else(|| String::from_utf8_lossy(&body).to_string());
        let current = parsed.and_then(|b| b.status);

        Err(error_for_status(status, message, current, target))
    }
}

/// Maps an HTTP failure back onto the booking error it was produced from.
fn error_for_status(
    status: StatusCode,
    message: String,
    current: Option<String>,
    target: Option<(BookingId, UserId, &str)>,
) -> BookingError {
    match (status, target) {
        (StatusCode::BAD_REQUEST, _) => BookingError::ValidationError(message),
        (StatusCode::FORBIDDEN, Some((booking, actor, action))) => BookingError::AuthorizationError {
            actor,
            action: action.to_string(),
            booking,
        },
        (StatusCode::NOT_FOUND, Some((booking, _, _))) => BookingError::NotFoundError(booking),
        (StatusCode::CONFLICT, Some((booking, _, _))) => BookingError::StateError {
            booking,
            status: current.unwrap_or_else(|| "resolved".to_string()),
        },
        _ => BookingError::network(format!("server responded {}: {}", status, message)),
    }
}

fn transport(e: reqwest::Error) -> BookingError {
    BookingError::network(e.to_string())
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn list_bookings(&self, _viewer: UserId) -> CoreResult<Vec<Booking>> {
        let response = self
            .authorized(self.client.get(self.url("/v1/bookings")))
            .send()
            .await
            .map_err(transport)?;
        Self::read(response, None).await
    }

    async fn create_booking(&self, _requester: UserId, request: &NewBooking) -> CoreResult<Booking> {
        let response = self
            .authorized(self.client.post(self.url("/v1/bookings")))
            .json(request)
            .send()
            .await
            .map_err(transport)?;
        Self::read(response, None).await
    }

    async fn update_status(
        &self,
        id: BookingId,
        actor: UserId,
        update: StatusUpdate,
    ) -> CoreResult<Booking> {
        // The server has never seen a provisional id.
        let Some(key) = id.assigned() else {
            return Err(BookingError::NotFoundError(id));
        };
        let action = gigbook_booking::BookingAction::for_target(update.status)
            .map(|a| a.as_str())
            .unwrap_or("update");

        let response = self
            .authorized(
                self.client
                    .patch(self.url(&format!("/v1/bookings/{}/status", key))),
            )
            .json(&update)
            .send()
            .await
            .map_err(transport)?;
        Self::read(response, Some((id, actor, action))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: Option<(BookingId, UserId, &str)> = Some((BookingId::Assigned(4), UserId(2), "accept"));

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            error_for_status(StatusCode::BAD_REQUEST, "bad".into(), None, None),
            BookingError::ValidationError(m) if m == "bad"
        ));
        assert_eq!(
            error_for_status(StatusCode::FORBIDDEN, String::new(), None, TARGET),
            BookingError::AuthorizationError {
                actor: UserId(2),
                action: "accept".to_string(),
                booking: BookingId::Assigned(4),
            }
        );
        assert_eq!(
            error_for_status(StatusCode::NOT_FOUND, String::new(), None, TARGET),
            BookingError::NotFoundError(BookingId::Assigned(4))
        );
        assert_eq!(
            error_for_status(StatusCode::CONFLICT, String::new(), Some("cancelled".into()), TARGET),
            BookingError::StateError {
                booking: BookingId::Assigned(4),
                status: "cancelled".to_string(),
            }
        );
        assert!(matches!(
            error_for_status(StatusCode::BAD_GATEWAY, "down".into(), None, TARGET),
            BookingError::NetworkError(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::FORBIDDEN, "no".into(), None, None),
            BookingError::NetworkError(_)
        ));
    }

    #[tokio::test]
    async fn test_provisional_id_is_not_sent() {
        // Port 9 is discard; nothing should be dialled anyway.
        let api = HttpBookingApi::new("http://127.0.0.1:9", Duration::from_millis(50), None);
        let id = BookingId::provisional();
        let err = api
            .update_status(id, UserId(1), StatusUpdate { status: gigbook_booking::BookingStatus::Cancelled })
            .await
            .unwrap_err();
        assert_eq!(err, BookingError::NotFoundError(id));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let api = HttpBookingApi::new("http://127.0.0.1:9", Duration::from_millis(200), None);
        let err = api.list_bookings(UserId(1)).await.unwrap_err();
        assert!(err.is_retryable());
    }
}
