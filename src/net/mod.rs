//! REST networking layer.
//!
//! ARCHITECTURE
//! ============
//! `transport` is the raw fetch seam, `client` runs every call through the
//! `pipeline` stages, and `api` names the endpoints. `error` and `types` are
//! shared with the state stores.

pub mod api;
pub mod client;
pub mod error;
pub mod pending;
pub mod pipeline;
pub mod transport;
pub mod types;
