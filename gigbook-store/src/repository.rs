use async_trait::async_trait;
use gigbook_booking::{Booking, BookingStatus, NewBooking};
use gigbook_core::CoreResult;
use gigbook_shared::{BookingId, UserId};
use serde::{Deserialize, Serialize};

/// Body of a status change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: BookingStatus,
}

/// Persistence contract for bookings.
///
/// Implementations are the authority on booking state: `update_status` must
/// apply the `requested` precondition atomically so that of two racing
/// actors exactly one wins.
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Every booking the viewer takes part in.
    async fn list_bookings(&self, viewer: UserId) -> CoreResult<Vec<Booking>>;

    /// Create a booking in `requested` status with a server-assigned id.
    async fn create_booking(&self, requester: UserId, request: &NewBooking) -> CoreResult<Booking>;

    async fn update_status(
        &self,
        id: BookingId,
        actor: UserId,
        update: StatusUpdate,
    ) -> CoreResult<Booking>;
}
