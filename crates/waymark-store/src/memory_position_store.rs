//! In-process position store for development and single-instance deployments.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use waymark_core::clock::Clock;
use waymark_core::error::DomainError;
use waymark_core::position::{SessionPosition, SessionPositionStore};
use waymark_core::session::SessionKey;

/// Keeps positions in a map guarded by a `RwLock`. Contents are lost on
/// restart.
pub struct InMemoryPositionStore {
    clock: Arc<dyn Clock>,
    positions: RwLock<HashMap<(String, SessionKey), SessionPosition>>,
}

impl std::fmt::Debug for InMemoryPositionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryPositionStore").finish_non_exhaustive()
    }
}

impl InMemoryPositionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            positions: RwLock::new(HashMap::new()),
        }
    }
}

fn poisoned() -> DomainError {
    DomainError::StorageUnavailable("in-memory position store lock poisoned".to_owned())
}

#[async_trait]
impl SessionPositionStore for InMemoryPositionStore {
    async fn load_position(
        &self,
        adventure_id: &str,
        session_key: &SessionKey,
    ) -> Result<Option<SessionPosition>, DomainError> {
        let positions = self.positions.read().map_err(|_| poisoned())?;
        Ok(positions
            .get(&(adventure_id.to_owned(), session_key.clone()))
            .cloned())
    }

    async fn save_position(
        &self,
        adventure_id: &str,
        session_key: &SessionKey,
        node_name: &str,
    ) -> Result<(), DomainError> {
        let position = SessionPosition {
            node_name: node_name.to_owned(),
            updated_at: self.clock.now(),
        };
        self.positions
            .write()
            .map_err(|_| poisoned())?
            .insert((adventure_id.to_owned(), session_key.clone()), position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_test_support::{FixedClock, fixed_instant};

    fn store() -> InMemoryPositionStore {
        InMemoryPositionStore::new(Arc::new(FixedClock::default()))
    }

    #[tokio::test]
    async fn test_load_missing_position_returns_none() {
        let store = store();

        let loaded = store
            .load_position("lighthouse", &SessionKey::new("u1"))
            .await
            .unwrap();

        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_position() {
        // Arrange
        let store = store();
        let key = SessionKey::new("u1");

        // Act
        store.save_position("lighthouse", &key, "shore").await.unwrap();
        store.save_position("lighthouse", &key, "cliff").await.unwrap();

        // Assert
        let loaded = store.load_position("lighthouse", &key).await.unwrap().unwrap();
        assert_eq!(loaded.node_name, "cliff");
        assert_eq!(loaded.updated_at, fixed_instant());
    }

    #[tokio::test]
    async fn test_positions_are_scoped_by_adventure_and_session() {
        // Arrange
        let store = store();
        let alice = SessionKey::new("alice");
        let bob = SessionKey::new("bob");

        // Act
        store.save_position("lighthouse", &alice, "shore").await.unwrap();
        store.save_position("caves", &alice, "entrance").await.unwrap();

        // Assert
        let lighthouse = store.load_position("lighthouse", &alice).await.unwrap();
        let caves = store.load_position("caves", &alice).await.unwrap();
        assert_eq!(lighthouse.unwrap().node_name, "shore");
        assert_eq!(caves.unwrap().node_name, "entrance");
        assert!(store.load_position("lighthouse", &bob).await.unwrap().is_none());
    }
}
