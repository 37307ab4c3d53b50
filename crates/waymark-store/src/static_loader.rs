//! Serves an adventure that was parsed once up front.

use std::sync::Arc;

use async_trait::async_trait;

use waymark_adventure::domain::adventure::Adventure;
use waymark_adventure::domain::loader::AdventureLoader;
use waymark_core::error::DomainError;

/// Hands out the same immutable adventure on every request.
#[derive(Debug, Clone)]
pub struct StaticAdventureLoader {
    adventure: Arc<Adventure>,
}

impl StaticAdventureLoader {
    /// Wraps an already-built adventure.
    #[must_use]
    pub fn new(adventure: impl Into<Arc<Adventure>>) -> Self {
        Self {
            adventure: adventure.into(),
        }
    }
}

#[async_trait]
impl AdventureLoader for StaticAdventureLoader {
    async fn load_adventure(&self) -> Result<Arc<Adventure>, DomainError> {
        Ok(Arc::clone(&self.adventure))
    }
}
