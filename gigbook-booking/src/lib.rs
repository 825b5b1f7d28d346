pub mod models;
pub mod policy;
pub mod machine;

pub use models::{Booking, BookingAction, BookingStatus, NewBooking};
pub use policy::{AuthorizationPolicy, Role};
pub use machine::BookingStateMachine;
