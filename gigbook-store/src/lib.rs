pub mod app_config;
pub mod repository;
pub mod cache;
pub mod store;
pub mod memory_repo;
pub mod http_repo;

pub use repository::{BookingApi, StatusUpdate};
pub use cache::{BookingCache, PendingMutation};
pub use store::{BookingDetails, BookingStore};
pub use memory_repo::MemoryBookingRepository;
pub use http_repo::HttpBookingApi;
