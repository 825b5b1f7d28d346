use gigbook_api::{
    app,
    state::{AppState, AuthConfig},
};
use gigbook_core::identity::InMemoryUserDirectory;
use gigbook_shared::SystemClock;
use gigbook_store::MemoryBookingRepository;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gigbook_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = gigbook_store::app_config::Config::load()?;
    tracing::info!("Starting Gigbook API on port {}", config.server.port);
    if config.auth.allow_dev_tokens {
        tracing::warn!("Development tokens are enabled");
    }

    let clock = Arc::new(SystemClock);
    let app_state = AppState {
        bookings: Arc::new(MemoryBookingRepository::new(clock.clone())),
        directory: Arc::new(InMemoryUserDirectory::new(config.users.clone())),
        clock,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
            allow_dev_tokens: config.auth.allow_dev_tokens,
        },
        calendar: config.calendar.clone(),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
