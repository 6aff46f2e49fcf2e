//! Quote store abstraction.
//!
//! Handlers never talk to a database directly. They go through [`QuoteStore`], which
//! the Postgres implementation backs in production and test doubles back in tests.

mod postgres;

pub use postgres::PgQuoteStore;

use async_trait::async_trait;
use serde::Serialize;

/// A single row of the `Quotes` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Quote {
    pub id: i64,
    pub author: String,
    pub text: String,
}

/// Read-only access to the quote table.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Number of rows currently in the table.
    async fn count(&self) -> Result<u64, sqlx::Error>;

    /// The row at `offset` when ordered by id ascending, if one exists.
    async fn fetch_at_offset(&self, offset: u64) -> Result<Option<Quote>, sqlx::Error>;

    /// One row chosen by the database's own random ordering.
    async fn fetch_random_ordered(&self) -> Result<Option<Quote>, sqlx::Error>;

    /// Trivial round-trip used by the health check.
    async fn ping(&self) -> Result<(), sqlx::Error>;
}
