//! Position store doubles.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use waymark_core::clock::Clock;
use waymark_core::error::DomainError;
use waymark_core::position::{SessionPosition, SessionPositionStore};
use waymark_core::session::SessionKey;

use crate::clock::FixedClock;

type PositionKey = (String, SessionKey);

/// An in-memory position store that records every save. Positions are stamped
/// with a [`FixedClock`].
///
/// Seed it with [`RecordingPositionStore::with_position`]; make saves fail
/// with [`RecordingPositionStore::failing_writes`] while reads keep working.
#[derive(Debug, Default)]
pub struct RecordingPositionStore {
    clock: FixedClock,
    positions: Mutex<HashMap<PositionKey, SessionPosition>>,
    saved: Mutex<Vec<(String, SessionKey, String)>>,
    fail_writes: bool,
}

impl RecordingPositionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a stored position. Seeding is not recorded as a save.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_position(self, adventure_id: &str, session_key: &SessionKey, node_name: &str) -> Self {
        self.positions.lock().unwrap().insert(
            (adventure_id.to_owned(), session_key.clone()),
            SessionPosition {
                node_name: node_name.to_owned(),
                updated_at: self.clock.now(),
            },
        );
        self
    }

    /// Makes every subsequent save fail with `StorageUnavailable`.
    #[must_use]
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Returns a snapshot of every successful save as
    /// `(adventure_id, session_key, node_name)`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn saved_positions(&self) -> Vec<(String, SessionKey, String)> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionPositionStore for RecordingPositionStore {
    async fn load_position(
        &self,
        adventure_id: &str,
        session_key: &SessionKey,
    ) -> Result<Option<SessionPosition>, DomainError> {
        Ok(self
            .positions
            .lock()
            .unwrap()
            .get(&(adventure_id.to_owned(), session_key.clone()))
            .cloned())
    }

    async fn save_position(
        &self,
        adventure_id: &str,
        session_key: &SessionKey,
        node_name: &str,
    ) -> Result<(), DomainError> {
        if self.fail_writes {
            return Err(DomainError::StorageUnavailable("write rejected".into()));
        }
        self.positions.lock().unwrap().insert(
            (adventure_id.to_owned(), session_key.clone()),
            SessionPosition {
                node_name: node_name.to_owned(),
                updated_at: self.clock.now(),
            },
        );
        self.saved.lock().unwrap().push((
            adventure_id.to_owned(),
            session_key.clone(),
            node_name.to_owned(),
        ));
        Ok(())
    }
}

/// A position store that is always unreachable. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingPositionStore;

#[async_trait]
impl SessionPositionStore for FailingPositionStore {
    async fn load_position(
        &self,
        _adventure_id: &str,
        _session_key: &SessionKey,
    ) -> Result<Option<SessionPosition>, DomainError> {
        Err(DomainError::StorageUnavailable("connection refused".into()))
    }

    async fn save_position(
        &self,
        _adventure_id: &str,
        _session_key: &SessionKey,
        _node_name: &str,
    ) -> Result<(), DomainError> {
        Err(DomainError::StorageUnavailable("connection refused".into()))
    }
}
