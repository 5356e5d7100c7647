//! Structured-logging conventions: canonical event names and field helpers.

pub mod events;
pub mod fields;
