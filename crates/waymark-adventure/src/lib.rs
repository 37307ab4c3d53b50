//! Waymark adventure bounded context.
//!
//! Responsible for the branching narrative graph, rendering node content into
//! speech responses, and walking the graph one intent at a time.

pub mod application;
pub mod domain;
