use gigbook_booking::Booking;
use gigbook_core::{BookingError, CoreResult};
use gigbook_shared::{BookingId, UserId};
use std::collections::HashSet;

/// Record of an optimistic write: the slot as it was before, and what was
/// written. Committing discards the snapshot, rolling back restores it.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "a pending mutation must be committed or rolled back"]
pub struct PendingMutation {
    key: BookingId,
    before: Option<(usize, Booking)>,
    after: Booking,
}

impl PendingMutation {
    pub fn key(&self) -> BookingId {
        self.key
    }

    pub fn staged(&self) -> &Booking {
        &self.after
    }
}

/// Client-side booking cache, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct BookingCache {
    bookings: Vec<Booking>,
    in_flight: HashSet<BookingId>,
    /// Requesters with a create request outstanding.
    creating: HashSet<UserId>,
}

impl BookingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn get(&self, id: BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    fn position(&self, id: BookingId) -> Option<usize> {
        self.bookings.iter().position(|b| b.id == id)
    }

    /// Replace confirmed records with a fresh server listing. Provisional
    /// records still waiting on their create request are kept.
    pub fn replace_confirmed(&mut self, fresh: Vec<Booking>) {
        let provisional: Vec<Booking> = self
            .bookings
            .drain(..)
            .filter(|b| b.is_provisional())
            .collect();
        self.bookings = fresh;
        self.bookings.extend(provisional);
    }

    /// Insert or overwrite by id, keeping position on overwrite.
    pub fn upsert(&mut self, booking: Booking) {
        match self.position(booking.id) {
            Some(index) => self.bookings[index] = booking,
            None => self.bookings.push(booking),
        }
    }

    pub fn remove(&mut self, id: BookingId) -> Option<Booking> {
        self.position(id).map(|index| self.bookings.remove(index))
    }

    /// Write `after` optimistically and remember what it replaced.
    pub fn stage(&mut self, after: Booking) -> PendingMutation {
        let key = after.id;
        let before = self
            .position(key)
            .map(|index| (index, self.bookings[index].clone()));
        self.upsert(after.clone());
        PendingMutation { key, before, after }
    }

    /// Swap the staged record for the confirmed one, in place.
    pub fn commit(&mut self, pending: PendingMutation, confirmed: Booking) {
        match self.position(pending.key) {
            Some(index) => {
                self.bookings[index] = confirmed;
                if let Some(dup) = self.duplicate_of(index) {
                    self.bookings.remove(dup);
                }
            }
            None => self.upsert(confirmed),
        }
    }

    /// Put the slot back exactly as it was before `stage`.
    pub fn rollback(&mut self, pending: PendingMutation) {
        self.remove(pending.key);
        if let Some((index, booking)) = pending.before {
            let index = index.min(self.bookings.len());
            self.bookings.insert(index, booking);
        }
    }

    /// A refresh may already have delivered the confirmed record.
    fn duplicate_of(&self, index: usize) -> Option<usize> {
        let id = self.bookings[index].id;
        self.bookings
            .iter()
            .enumerate()
            .find(|(i, b)| *i != index && b.id == id)
            .map(|(i, _)| i)
    }

    /// Claim the single mutation slot for `id`.
    pub fn begin(&mut self, id: BookingId) -> CoreResult<()> {
        if !self.in_flight.insert(id) {
            return Err(BookingError::MutationInFlight(id));
        }
        Ok(())
    }

    pub fn finish(&mut self, id: BookingId) {
        self.in_flight.remove(&id);
    }

    /// Whether controls for `id` should be disabled.
    pub fn is_pending(&self, id: BookingId) -> bool {
        self.in_flight.contains(&id)
    }

    /// Claim the single create slot for `requester`. `staged` names the
    /// provisional record the refused attempt would have added.
    pub fn begin_create(&mut self, requester: UserId, staged: BookingId) -> CoreResult<()> {
        if !self.creating.insert(requester) {
            return Err(BookingError::MutationInFlight(staged));
        }
        Ok(())
    }

    pub fn finish_create(&mut self, requester: UserId) {
        self.creating.remove(&requester);
    }

    /// Whether the submit control for `requester` should be disabled.
    pub fn is_creating(&self, requester: UserId) -> bool {
        self.creating.contains(&requester)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use gigbook_booking::{BookingStatus, NewBooking};

    fn booking(id: BookingId) -> Booking {
        NewBooking::new(UserId(2), NaiveDate::from_ymd_opt(2025, 3, 10).unwrap())
            .into_booking(id, UserId(1), Utc::now())
    }

    fn seeded() -> BookingCache {
        let mut cache = BookingCache::new();
        cache.replace_confirmed(vec![
            booking(BookingId::Assigned(1)),
            booking(BookingId::Assigned(2)),
        ]);
        cache
    }

    #[test]
    fn test_stage_and_rollback_insert() {
        let mut cache = seeded();
        let snapshot = cache.bookings().to_vec();

        let pending = cache.stage(booking(BookingId::provisional()));
        assert_eq!(cache.bookings().len(), 3);
        assert_eq!(cache.get(pending.key()).unwrap().status, BookingStatus::Requested);

        cache.rollback(pending);
        assert_eq!(cache.bookings(), snapshot.as_slice());
    }

    #[test]
    fn test_stage_and_rollback_overwrite() {
        let mut cache = seeded();
        let snapshot = cache.bookings().to_vec();

        let mut changed = booking(BookingId::Assigned(1));
        changed.status = BookingStatus::Cancelled;
        let pending = cache.stage(changed);
        assert_eq!(cache.get(BookingId::Assigned(1)).unwrap().status, BookingStatus::Cancelled);

        cache.rollback(pending);
        assert_eq!(cache.bookings(), snapshot.as_slice());
    }

    #[test]
    fn test_commit_replaces_provisional_in_place() {
        let mut cache = seeded();
        let provisional = booking(BookingId::provisional());
        let pending = cache.stage(provisional);
        let confirmed = booking(BookingId::Assigned(3));
        cache.commit(pending, confirmed.clone());

        let ids: Vec<BookingId> = cache.bookings().iter().map(|b| b.id).collect();
        assert_eq!(
            ids,
            vec![BookingId::Assigned(1), BookingId::Assigned(2), BookingId::Assigned(3)]
        );
        assert!(cache.bookings().iter().all(|b| !b.is_provisional()));
    }

    #[test]
    fn test_commit_after_refresh_does_not_duplicate() {
        let mut cache = seeded();
        let pending = cache.stage(booking(BookingId::provisional()));
        let confirmed = booking(BookingId::Assigned(3));
        cache.replace_confirmed(vec![
            booking(BookingId::Assigned(1)),
            booking(BookingId::Assigned(2)),
            confirmed.clone(),
        ]);
        cache.commit(pending, confirmed);
        assert_eq!(cache.bookings().len(), 3);
    }

    #[test]
    fn test_refresh_keeps_provisional() {
        let mut cache = seeded();
        let pending = cache.stage(booking(BookingId::provisional()));
        cache.replace_confirmed(vec![booking(BookingId::Assigned(5))]);
        assert_eq!(cache.bookings().len(), 2);
        assert!(cache.get(pending.key()).is_some());
        cache.rollback(pending);
        assert_eq!(cache.bookings().len(), 1);
    }

    #[test]
    fn test_single_mutation_per_booking() {
        let mut cache = seeded();
        let id = BookingId::Assigned(1);
        cache.begin(id).unwrap();
        assert!(cache.is_pending(id));
        assert_eq!(cache.begin(id), Err(BookingError::MutationInFlight(id)));
        cache.begin(BookingId::Assigned(2)).unwrap();
        cache.finish(id);
        assert!(!cache.is_pending(id));
        cache.begin(id).unwrap();
    }

    #[test]
    fn test_single_create_per_requester() {
        let mut cache = seeded();
        let first = BookingId::provisional();
        let second = BookingId::provisional();
        cache.begin_create(UserId(1), first).unwrap();
        assert!(cache.is_creating(UserId(1)));
        assert_eq!(
            cache.begin_create(UserId(1), second),
            Err(BookingError::MutationInFlight(second))
        );
        cache.begin_create(UserId(2), second).unwrap();
        cache.finish_create(UserId(1));
        assert!(!cache.is_creating(UserId(1)));
        cache.begin_create(UserId(1), first).unwrap();
    }
}
