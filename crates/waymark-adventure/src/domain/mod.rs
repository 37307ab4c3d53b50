//! Domain layer for the adventure context.

pub mod adventure;
pub mod commands;
pub mod dialogue;
pub mod loader;
pub mod request;
pub mod response;
pub mod speech;

#[cfg(test)]
pub(crate) mod fixtures;
