use chrono::Weekday;
use gigbook_calendar::CalendarView;
use gigbook_shared::User;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub client: ClientConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    /// Directory seed for display names.
    #[serde(default)]
    pub users: Vec<User>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
    /// Enables `POST /v1/auth/dev-token`. Never set in production.
    #[serde(default)]
    pub allow_dev_tokens: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CalendarConfig {
    #[serde(default)]
    pub default_view: CalendarView,
    #[serde(default = "default_week_start")]
    pub week_starts_on: Weekday,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            default_view: CalendarView::default(),
            week_starts_on: default_week_start(),
        }
    }
}

fn default_timeout_ms() -> u64 { 10_000 }

fn default_week_start() -> Weekday { Weekday::Sun }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Optional per-environment overrides
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local, uncommitted overrides
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `GIGBOOK__SERVER__PORT=8080`
            .add_source(config::Environment::with_prefix("GIGBOOK").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
