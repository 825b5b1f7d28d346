use gigbook_core::identity::UserDirectory;
use gigbook_shared::Clock;
use gigbook_store::app_config::CalendarConfig;
use gigbook_store::BookingApi;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
    pub allow_dev_tokens: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<dyn BookingApi>,
    pub directory: Arc<dyn UserDirectory>,
    pub clock: Arc<dyn Clock>,
    pub auth: AuthConfig,
    pub calendar: CalendarConfig,
}
