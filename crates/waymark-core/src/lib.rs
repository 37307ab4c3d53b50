//! Waymark core: shared domain abstractions.
//!
//! Defines the error taxonomy, the session position store contract and the
//! small determinism seams (clock, command) every other crate builds on.
//! Contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod position;
pub mod session;
