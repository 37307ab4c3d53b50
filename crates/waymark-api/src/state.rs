//! Shared application state.

use std::sync::Arc;

use waymark_adventure::domain::loader::AdventureLoader;
use waymark_core::position::SessionPositionStore;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Source of the adventure graph.
    pub adventure_loader: Arc<dyn AdventureLoader>,
    /// Where session positions live.
    pub position_store: Arc<dyn SessionPositionStore>,
    /// Base URL audio fragments resolve against.
    pub media_base_url: Arc<str>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        adventure_loader: Arc<dyn AdventureLoader>,
        position_store: Arc<dyn SessionPositionStore>,
        media_base_url: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            adventure_loader,
            position_store,
            media_base_url: media_base_url.into(),
        }
    }
}
