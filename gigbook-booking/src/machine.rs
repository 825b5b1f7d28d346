use crate::models::{Booking, BookingAction, BookingStatus};
use crate::policy::AuthorizationPolicy;
use gigbook_core::{BookingError, CoreResult};
use gigbook_shared::UserId;

/// Validates and applies status transitions on a single booking.
///
/// `requested` is the only state with outgoing transitions; `accepted`,
/// `rejected` and `cancelled` are final.
pub struct BookingStateMachine;

impl BookingStateMachine {
    /// Transition: Requested → Accepted | Rejected | Cancelled.
    ///
    /// The state check runs first, so acting on a settled booking reports
    /// `StateError` whoever the actor is.
    pub fn transition(booking: &Booking, actor: UserId, action: BookingAction) -> CoreResult<Booking> {
        let mut next = booking.clone();
        Self::apply(&mut next, actor, action)?;
        Ok(next)
    }

    /// In-place variant of [`BookingStateMachine::transition`]. Leaves the
    /// booking untouched on error.
    pub fn apply(booking: &mut Booking, actor: UserId, action: BookingAction) -> CoreResult<()> {
        if booking.status != BookingStatus::Requested {
            return Err(BookingError::StateError {
                booking: booking.id,
                status: booking.status.to_string(),
            });
        }

        if !AuthorizationPolicy::permits(actor, booking, action) {
            return Err(BookingError::AuthorizationError {
                actor,
                action: action.to_string(),
                booking: booking.id,
            });
        }

        let to = action.target_status();
        tracing::debug!("Booking {}: {} -> {} by user {}", booking.id, booking.status, to, actor);
        booking.status = to;
        Ok(())
    }
}
