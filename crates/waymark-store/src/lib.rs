//! Storage adapters for the Waymark adventure engine.
//!
//! Adventure loaders read the narrative graph; position stores persist which
//! node each session is on.

pub mod file_loader;
pub mod memory_position_store;
pub mod pg_position_store;
pub mod schema;
pub mod static_loader;

pub use file_loader::FileAdventureLoader;
pub use memory_position_store::InMemoryPositionStore;
pub use pg_position_store::PgPositionStore;
pub use static_loader::StaticAdventureLoader;
