//! Control server
//!
//! Exposes the local engine to the partner over HTTP. Unauthenticated by
//! design of the pairing model: run it on a trusted LAN only.

pub mod routes;
pub mod server;

pub use routes::build_router;
pub use server::{AppState, ControlServer};
