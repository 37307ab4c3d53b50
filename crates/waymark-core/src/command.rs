//! Command abstractions.

use uuid::Uuid;

/// Trait implemented by every request the adventure engine acts on.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Stable command name used in log fields.
    fn command_type(&self) -> &'static str;

    /// Correlation ID tying log lines of a single turn together.
    fn correlation_id(&self) -> Uuid;
}
