//! Position store database schema.

/// SQL to create the session positions table. Kept in sync with
/// `migrations/0001_session_positions.sql`.
pub const CREATE_SESSION_POSITIONS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS session_positions (
    adventure_id    VARCHAR(255) NOT NULL,
    session_key     VARCHAR(512) NOT NULL,
    node_name       VARCHAR(255) NOT NULL,
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    PRIMARY KEY (adventure_id, session_key)
);
";
