pub mod identity;

use gigbook_shared::{BookingId, UserId};
use serde::Serialize;

/// Everything that can go wrong while creating or transitioning a booking.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BookingError {
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("User {actor} is not allowed to {action} booking {booking}")]
    AuthorizationError {
        actor: UserId,
        action: String,
        booking: BookingId,
    },

    #[error("Booking {booking} is already {status}")]
    StateError {
        booking: BookingId,
        status: String,
    },

    #[error("Network failure: {0}")]
    NetworkError(String),

    #[error("Booking not found: {0}")]
    NotFoundError(BookingId),

    #[error("Booking {0} already has a pending change")]
    MutationInFlight(BookingId),
}

/// Where the UI reports an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    /// Next to the form field; the user fixes the input and resubmits.
    Inline,
    /// Page-level banner.
    Banner,
}

impl BookingError {
    pub fn validation(msg: impl Into<String>) -> Self {
        BookingError::ValidationError(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        BookingError::NetworkError(msg.into())
    }

    pub fn surface(&self) -> Surface {
        match self {
            BookingError::ValidationError(_) => Surface::Inline,
            _ => Surface::Banner,
        }
    }

    /// Optimistic cache changes made for the failed action must be undone.
    pub fn rolls_back(&self) -> bool {
        matches!(self, BookingError::NetworkError(_) | BookingError::NotFoundError(_))
    }

    /// The booking referenced by the failed action must leave the cache.
    pub fn evicts_cache_entry(&self) -> bool {
        matches!(self, BookingError::NotFoundError(_))
    }

    /// Whether offering a manual "retry" makes sense. Never retried automatically.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BookingError::NetworkError(_) | BookingError::MutationInFlight(_))
    }
}

pub type CoreResult<T> = Result<T, BookingError>;
