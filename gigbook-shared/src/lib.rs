pub mod clock;
pub mod models;
pub mod time;

pub use clock::{Clock, FixedClock, SystemClock};
pub use models::ids::{BookingId, UserId};
pub use models::user::User;
