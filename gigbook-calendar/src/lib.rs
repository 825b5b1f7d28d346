pub mod window;
pub mod projector;
pub mod filter;

pub use window::{CalendarView, DateRange, Navigate, ViewWindow};
pub use projector::{CalendarEvent, CalendarProjector, Projection, StatusCategory};
pub use filter::{BookingFilterView, CalendarContext, FilterToggles, ToggleKind};
