//! Waymark API server entry point.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use waymark_adventure::domain::loader::AdventureLoader;
use waymark_api::config::AppConfig;
use waymark_api::error::AppError;
use waymark_api::state::AppState;
use waymark_core::clock::{Clock, SystemClock};
use waymark_core::position::SessionPositionStore;
use waymark_store::{
    FileAdventureLoader, InMemoryPositionStore, PgPositionStore, StaticAdventureLoader,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Waymark API server");

    let config = AppConfig::from_env()?;

    let adventure_loader = adventure_loader(&config).await?;
    let position_store = position_store(&config).await?;
    let app_state = AppState::new(adventure_loader, position_store, config.media_base_url.as_str());

    let app = waymark_api::build_router(app_state).layer(TraceLayer::new_for_http());

    let addr = config.bind_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}

async fn adventure_loader(config: &AppConfig) -> Result<Arc<dyn AdventureLoader>, AppError> {
    let file_loader = FileAdventureLoader::new(config.adventure_path.clone());

    // Fail fast on a broken file even when hot reload is on.
    let adventure = file_loader.load_adventure().await?;
    tracing::info!(
        adventure_id = adventure.id(),
        path = %config.adventure_path.display(),
        hot_reload = config.adventure_hot_reload,
        "adventure loaded"
    );

    if config.adventure_hot_reload {
        Ok(Arc::new(file_loader))
    } else {
        Ok(Arc::new(StaticAdventureLoader::new(adventure)))
    }
}

async fn position_store(config: &AppConfig) -> Result<Arc<dyn SessionPositionStore>, AppError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; session positions are kept in memory");
        return Ok(Arc::new(InMemoryPositionStore::new(clock)));
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    let store = PgPositionStore::new(pool, clock);
    store.ensure_schema().await?;

    Ok(Arc::new(store))
}
