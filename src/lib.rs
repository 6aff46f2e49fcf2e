//! Quote service: serves a random quote from a SQL store over HTTP.
//!
//! `GET /` counts the `Quotes` table, picks a uniformly random offset and renders
//! the single row found there. `GET /health` round-trips to the store.

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod selection;
pub mod state;
pub mod store;
pub mod templates;
