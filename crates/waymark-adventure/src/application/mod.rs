//! Application layer for the adventure context.

pub mod command_handlers;
pub mod query_handlers;
