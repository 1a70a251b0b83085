//! Orderflow server library: HTTP API, shared state, metrics endpoint.
//!
//! The binary in `main.rs` wires configuration, stores, the scheduler and
//! the router; everything it uses lives here so integration tests can build
//! the same router in-process.

pub mod api;
pub mod metrics;
pub mod state;
