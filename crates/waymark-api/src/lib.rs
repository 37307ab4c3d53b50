//! Waymark API library: router, state, configuration and error types.

pub mod config;
pub mod envelope;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Builds the application router. `main` adds the HTTP trace layer.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/adventure", routes::skill::router())
        .with_state(state)
}
