//! Query handlers for the adventure context.
//!
//! Read-only views over a session's stored position, resolved against the
//! currently loaded adventure.

use chrono::{DateTime, Utc};
use serde::Serialize;
use waymark_core::error::DomainError;
use waymark_core::position::SessionPositionStore;
use waymark_core::session::SessionKey;

use crate::domain::loader::AdventureLoader;

/// Read-only view of a session's position.
#[derive(Debug, Serialize)]
pub struct PositionView {
    /// The adventure the position belongs to.
    pub adventure_id: String,
    /// The session the position belongs to.
    pub session_key: SessionKey,
    /// The stored node name; `None` if the session has not started.
    pub node_name: Option<String>,
    /// Whether the stored node still exists in the adventure.
    pub node_exists: bool,
    /// Whether the stored node offers choices (launch would offer resume).
    pub has_routes: bool,
    /// When the position was last written.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Retrieves the position of `session_key` in the current adventure.
///
/// # Errors
///
/// Returns `DomainError` if the adventure or the position cannot be loaded.
pub async fn get_position(
    session_key: &SessionKey,
    loader: &dyn AdventureLoader,
    store: &dyn SessionPositionStore,
) -> Result<PositionView, DomainError> {
    let adventure = loader.load_adventure().await?;
    let stored = store.load_position(adventure.id(), session_key).await?;
    let node = stored.as_ref().and_then(|p| adventure.node(&p.node_name));

    Ok(PositionView {
        adventure_id: adventure.id().to_owned(),
        session_key: session_key.clone(),
        node_name: stored.as_ref().map(|p| p.node_name.clone()),
        node_exists: node.is_some(),
        has_routes: node.is_some_and(|n| n.has_routes()),
        updated_at: stored.map(|p| p.updated_at),
    })
}
