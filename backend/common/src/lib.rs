//! Plumbing shared by the `proxy` and `stats` binaries.
//!
//! - [`env`]: the only place environment variables and secrets are read
//! - [`telemetry`]: tracing subscriber setup
//! - [`signal`]: graceful shutdown future for axum servers

pub mod env;
pub mod signal;
pub mod telemetry;
