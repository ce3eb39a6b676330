//! Counter rows, aggregate snapshots, and request-level value types.

pub mod campaign;
pub mod reset;
