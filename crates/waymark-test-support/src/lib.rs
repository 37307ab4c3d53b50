//! Shared test doubles and utilities for the Waymark adventure engine.

mod clock;
mod position;

pub use clock::{FixedClock, fixed_instant};
pub use position::{FailingPositionStore, RecordingPositionStore};
