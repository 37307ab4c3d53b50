//! `PostgreSQL` implementation of the `SessionPositionStore` trait.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use waymark_core::clock::Clock;
use waymark_core::error::DomainError;
use waymark_core::position::{SessionPosition, SessionPositionStore};
use waymark_core::session::SessionKey;

use crate::schema::CREATE_SESSION_POSITIONS_TABLE;

/// PostgreSQL-backed position store. Saves are upserts, so concurrent turns
/// for one session are last-writer-wins.
#[derive(Clone)]
pub struct PgPositionStore {
    pool: PgPool,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for PgPositionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgPositionStore")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

fn unavailable(err: &sqlx::Error) -> DomainError {
    DomainError::StorageUnavailable(format!("position store: {err}"))
}

impl PgPositionStore {
    /// Creates a new `PgPositionStore`.
    #[must_use]
    pub fn new(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Creates the positions table if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StorageUnavailable` if the statement fails.
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::raw_sql(CREATE_SESSION_POSITIONS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| unavailable(&e))?;
        Ok(())
    }
}

#[async_trait]
impl SessionPositionStore for PgPositionStore {
    async fn load_position(
        &self,
        adventure_id: &str,
        session_key: &SessionKey,
    ) -> Result<Option<SessionPosition>, DomainError> {
        let row: Option<(String, DateTime<Utc>)> = sqlx::query_as(
            "SELECT node_name, updated_at FROM session_positions \
             WHERE adventure_id = $1 AND session_key = $2",
        )
        .bind(adventure_id)
        .bind(session_key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unavailable(&e))?;

        Ok(row.map(|(node_name, updated_at)| SessionPosition {
            node_name,
            updated_at,
        }))
    }

    async fn save_position(
        &self,
        adventure_id: &str,
        session_key: &SessionKey,
        node_name: &str,
    ) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO session_positions (adventure_id, session_key, node_name, updated_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (adventure_id, session_key) \
             DO UPDATE SET node_name = EXCLUDED.node_name, updated_at = EXCLUDED.updated_at",
        )
        .bind(adventure_id)
        .bind(session_key.as_str())
        .bind(node_name)
        .bind(self.clock.now())
        .execute(&self.pool)
        .await
        .map_err(|e| unavailable(&e))?;

        debug!(adventure_id, session_key = %session_key, node_name, "position saved");
        Ok(())
    }
}
