use crate::repository::{BookingApi, StatusUpdate};
use async_trait::async_trait;
use gigbook_booking::{Booking, BookingAction, BookingStateMachine, NewBooking};
use gigbook_core::{BookingError, CoreResult};
use gigbook_shared::{BookingId, Clock, UserId};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Authoritative booking records held in memory.
///
/// Status changes are checked and written under one write lock, so two
/// competing transitions on the same booking resolve to a single winner.
pub struct MemoryBookingRepository {
    clock: Arc<dyn Clock>,
    next_id: AtomicI64,
    bookings: RwLock<BTreeMap<i64, Booking>>,
}

impl MemoryBookingRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            next_id: AtomicI64::new(1),
            bookings: RwLock::new(BTreeMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.bookings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.bookings.read().await.is_empty()
    }
}

#[async_trait]
impl BookingApi for MemoryBookingRepository {
    async fn list_bookings(&self, viewer: UserId) -> CoreResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings
            .values()
            .filter(|b| b.involves(viewer))
            .cloned()
            .collect())
    }

    async fn create_booking(&self, requester: UserId, request: &NewBooking) -> CoreResult<Booking> {
        let request = request.clone().normalized();
        request.validate(requester, self.clock.today())?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let booking = request.into_booking(BookingId::Assigned(id), requester, self.clock.now());

        self.bookings.write().await.insert(id, booking.clone());
        tracing::debug!("Stored booking {} from {} to {}", id, requester, booking.recipient_id);
        Ok(booking)
    }

    async fn update_status(
        &self,
        id: BookingId,
        actor: UserId,
        update: StatusUpdate,
    ) -> CoreResult<Booking> {
        let key = id.assigned().ok_or(BookingError::NotFoundError(id))?;
        let action = BookingAction::for_target(update.status).ok_or_else(|| {
            BookingError::validation(format!("Cannot move a booking to {}", update.status))
        })?;

        let mut bookings = self.bookings.write().await;
        let booking = bookings.get_mut(&key).ok_or(BookingError::NotFoundError(id))?;
        BookingStateMachine::apply(booking, actor, action)?;
        Ok(booking.clone())
    }
}
