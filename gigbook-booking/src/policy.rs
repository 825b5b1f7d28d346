use crate::models::{Booking, BookingAction, BookingStatus};
use gigbook_shared::UserId;

/// Relationship of an actor to a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Requester,
    Recipient,
    None,
}

/// Single source of truth for who may act on a booking. Pure.
pub struct AuthorizationPolicy;

impl AuthorizationPolicy {
    pub fn role_of(actor: UserId, booking: &Booking) -> Role {
        if actor == booking.recipient_id {
            Role::Recipient
        } else if actor == booking.requester_id {
            Role::Requester
        } else {
            Role::None
        }
    }

    /// Recipients accept or reject, requesters cancel. Nothing else is allowed.
    pub fn permits(actor: UserId, booking: &Booking, action: BookingAction) -> bool {
        match (action, Self::role_of(actor, booking)) {
            (BookingAction::Accept | BookingAction::Reject, Role::Recipient) => true,
            (BookingAction::Cancel, Role::Requester) => true,
            _ => false,
        }
    }

    /// Actions to offer as controls: empty unless the booking is still requested.
    pub fn available_actions(actor: UserId, booking: &Booking) -> Vec<BookingAction> {
        if booking.status != BookingStatus::Requested {
            return Vec::new();
        }
        BookingAction::ALL
            .into_iter()
            .filter(|action| Self::permits(actor, booking, *action))
            .collect()
    }
}
