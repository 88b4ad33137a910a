//! Observability for fieldrules
//!
//! Logging goes through the `tracing` facade. The crate never installs a
//! subscriber; hosts decide where events end up.
//!
//! # Levels
//!
//! - `trace`: per-field and per-rule detail
//! - `debug`: start and summary of each validation call
//! - `warn`: configuration defects (unknown rule, depth limit, rejected registry)

mod events;

pub use events::Event;
