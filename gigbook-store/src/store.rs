use crate::cache::BookingCache;
use crate::repository::{BookingApi, StatusUpdate};
use gigbook_booking::{AuthorizationPolicy, Booking, BookingAction, BookingStateMachine, NewBooking};
use gigbook_core::identity::UserDirectory;
use gigbook_core::{BookingError, CoreResult};
use gigbook_shared::{BookingId, Clock, UserId};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

const UNKNOWN_USER: &str = "Unknown user";

/// Everything the booking details panel shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingDetails {
    pub booking: Booking,
    pub requester_name: String,
    pub recipient_name: String,
    pub available_actions: Vec<BookingAction>,
    /// Controls stay disabled while true.
    pub pending: bool,
}

/// Client-side booking cache with optimistic creates.
///
/// Creates show up immediately under a provisional id and are rolled back if
/// the server refuses or cannot be reached. Status changes are applied only
/// once the server has confirmed them. After every successful mutation the
/// whole list is fetched again.
pub struct BookingStore {
    api: Arc<dyn BookingApi>,
    clock: Arc<dyn Clock>,
    cache: RwLock<BookingCache>,
}

impl BookingStore {
    pub fn new(api: Arc<dyn BookingApi>, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            clock,
            cache: RwLock::new(BookingCache::new()),
        }
    }

    pub async fn snapshot(&self) -> Vec<Booking> {
        self.cache.read().await.bookings().to_vec()
    }

    pub async fn get(&self, id: BookingId) -> Option<Booking> {
        self.cache.read().await.get(id).cloned()
    }

    pub async fn is_pending(&self, id: BookingId) -> bool {
        self.cache.read().await.is_pending(id)
    }

    /// True while a create request from `requester` is outstanding.
    pub async fn is_creating(&self, requester: UserId) -> bool {
        self.cache.read().await.is_creating(requester)
    }

    /// Fetch the viewer's bookings and make them the cache contents.
    pub async fn list(&self, viewer: UserId) -> CoreResult<Vec<Booking>> {
        let fetched = self.api.list_bookings(viewer).await?;
        let scoped: Vec<Booking> = fetched.into_iter().filter(|b| b.involves(viewer)).collect();

        let mut cache = self.cache.write().await;
        cache.replace_confirmed(scoped.clone());
        Ok(scoped)
    }

    /// Request a booking. The provisional record is visible as soon as this
    /// is called and replaced by the server's record on success. A second
    /// request from the same requester fails with `MutationInFlight` until
    /// the first has settled.
    pub async fn create(&self, requester: UserId, data: NewBooking) -> CoreResult<Booking> {
        let data = data.normalized();
        data.validate(requester, self.clock.today())?;

        let provisional = data
            .clone()
            .into_booking(BookingId::provisional(), requester, self.clock.now());
        let pending = {
            let mut cache = self.cache.write().await;
            cache.begin_create(requester, provisional.id)?;
            if let Err(e) = cache.begin(provisional.id) {
                cache.finish_create(requester);
                return Err(e);
            }
            cache.stage(provisional)
        };
        let key = pending.key();

        match self.api.create_booking(requester, &data).await {
            Ok(confirmed) => {
                {
                    let mut cache = self.cache.write().await;
                    cache.commit(pending, confirmed.clone());
                    cache.finish(key);
                    cache.finish_create(requester);
                }
                info!("Booking {} requested by {} (was {})", confirmed.id, requester, key);
                self.refresh(requester).await;
                Ok(confirmed)
            }
            Err(e) => {
                let mut cache = self.cache.write().await;
                cache.rollback(pending);
                cache.finish(key);
                cache.finish_create(requester);
                warn!("Booking request {} rolled back: {}", key, e);
                Err(e)
            }
        }
    }

    /// Accept, reject or cancel a cached booking on behalf of `actor`.
    pub async fn apply_transition(
        &self,
        id: BookingId,
        actor: UserId,
        action: BookingAction,
    ) -> CoreResult<Booking> {
        {
            let mut cache = self.cache.write().await;
            let booking = cache.get(id).ok_or(BookingError::NotFoundError(id))?;
            // Local check only; the server re-checks under its own lock.
            BookingStateMachine::transition(booking, actor, action)?;
            cache.begin(id)?;
        }

        let update = StatusUpdate {
            status: action.target_status(),
        };
        let result = self.api.update_status(id, actor, update).await;

        {
            let mut cache = self.cache.write().await;
            cache.finish(id);
            match &result {
                Ok(confirmed) => cache.upsert(confirmed.clone()),
                Err(BookingError::NotFoundError(_)) => {
                    cache.remove(id);
                }
                Err(_) => {}
            }
        }

        match result {
            Ok(confirmed) => {
                info!("Booking {} is now {} ({} by {})", id, confirmed.status, action, actor);
                self.refresh(actor).await;
                Ok(confirmed)
            }
            Err(e @ BookingError::StateError { .. }) => {
                warn!("Booking {} changed before {} by {} landed", id, action, actor);
                self.refresh(actor).await;
                Err(e)
            }
            Err(e) => {
                warn!("Could not {} booking {}: {}", action, id, e);
                Err(e)
            }
        }
    }

    /// Details panel data for `viewer`. Names are display-only.
    pub async fn details(
        &self,
        id: BookingId,
        viewer: UserId,
        directory: &dyn UserDirectory,
    ) -> CoreResult<BookingDetails> {
        let (booking, pending) = {
            let cache = self.cache.read().await;
            let booking = cache.get(id).cloned().ok_or(BookingError::NotFoundError(id))?;
            (booking, cache.is_pending(id))
        };

        let requester_name = display_name(directory, booking.requester_id).await;
        let recipient_name = display_name(directory, booking.recipient_id).await;
        let available_actions = if pending {
            Vec::new()
        } else {
            AuthorizationPolicy::available_actions(viewer, &booking)
        };

        Ok(BookingDetails {
            booking,
            requester_name,
            recipient_name,
            available_actions,
            pending,
        })
    }

    async fn refresh(&self, viewer: UserId) {
        if let Err(e) = self.list(viewer).await {
            warn!("Booking list refresh failed, keeping local copy: {}", e);
        }
    }
}

async fn display_name(directory: &dyn UserDirectory, id: UserId) -> String {
    match directory.find_user(id).await {
        Ok(Some(user)) => user.display_name,
        Ok(None) => UNKNOWN_USER.to_string(),
        Err(e) => {
            warn!("User directory lookup for {} failed: {}", id, e);
            UNKNOWN_USER.to_string()
        }
    }
}
