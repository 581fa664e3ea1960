//! Budget (insurance quote) validation and the entity services around it.
//!
//! The `quoting` module holds the request validator together with the
//! repository traits, an in-memory store, services and HTTP routes that
//! feed it. `config`, `telemetry` and `error` carry the process-level
//! concerns shared with the API binary.

pub mod config;
pub mod error;
pub mod quoting;
pub mod telemetry;
