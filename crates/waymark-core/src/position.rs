//! Session position store abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::DomainError;
use crate::session::SessionKey;

/// The persisted "current node" of one session within one adventure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionPosition {
    /// Name of the node the session is on.
    pub node_name: String,
    /// When the position was last written.
    pub updated_at: DateTime<Utc>,
}

/// Maps `(adventure, session)` to the node the session currently sits on.
///
/// Absence of a position is meaningful state ("not started"), not an error.
/// Concurrent saves for the same key are last-writer-wins.
#[async_trait]
pub trait SessionPositionStore: Send + Sync {
    /// Loads the stored position, if any.
    async fn load_position(
        &self,
        adventure_id: &str,
        session_key: &SessionKey,
    ) -> Result<Option<SessionPosition>, DomainError>;

    /// Overwrites the stored position with `node_name`.
    async fn save_position(
        &self,
        adventure_id: &str,
        session_key: &SessionKey,
        node_name: &str,
    ) -> Result<(), DomainError>;
}
