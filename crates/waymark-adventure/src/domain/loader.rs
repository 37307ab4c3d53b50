//! Adventure source abstraction.

use std::sync::Arc;

use async_trait::async_trait;
use waymark_core::error::DomainError;

use super::adventure::Adventure;

/// Read-only source of the adventure graph, consulted once per request.
#[async_trait]
pub trait AdventureLoader: Send + Sync {
    /// Loads the adventure.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StorageUnavailable` if the source cannot be
    /// reached, or `DomainError::MalformedAdventure` if it cannot be parsed.
    async fn load_adventure(&self) -> Result<Arc<Adventure>, DomainError>;
}
