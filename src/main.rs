use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod state;

use refacademy_portal::config;
use refacademy_portal::gateway::build_gateway;
use refacademy_portal::storage::FileStore;
use state::AppState;

/// How often expired sessions are dropped
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(10 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "refacademy_portal=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let mut app_config = config::load_config().map_err(anyhow::Error::msg)?;
    app_config.apply_env();
    tracing::info!("Server will listen on {}:{}", app_config.server.host, app_config.server.port);

    // Create data directory if not exists
    let data_dir = app_config.get_data_dir();
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        tracing::info!("Created data directory: {:?}", data_dir);
    }

    let store = Arc::new(FileStore::open(app_config.get_local_store_path())?);
    tracing::info!("Local store at {:?}", store.path());

    let gateway = build_gateway(&app_config.backend)?;
    let bind_addr = app_config.get_bind_address();
    let state = Arc::new(AppState::new(app_config, store, gateway));

    let purge_state = state.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            let removed = purge_state.purge_expired();
            if removed > 0 {
                tracing::debug!("Purged {} expired sessions", removed);
            }
        }
    });

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server running at http://{}", bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
