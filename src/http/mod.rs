//! HTTP server module.
//!
//! Serves plain HTTP; TLS termination belongs to the hosting environment.
//! SIGTERM/SIGINT trigger a graceful shutdown that drains open connections.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
