//! Counter, reset, and dashboard logic shared by the HTTP routes.

pub mod aggregation;
pub mod counter;
pub mod dashboard;
