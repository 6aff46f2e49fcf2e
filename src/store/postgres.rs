//! Postgres-backed quote store.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{Quote, QuoteStore};

const COUNT_SQL: &str = "SELECT COUNT(*) FROM Quotes";

// NULL authors or texts render as empty strings rather than failing to decode.
const FETCH_AT_OFFSET_SQL: &str = "SELECT CAST(Id AS BIGINT) AS id, \
     COALESCE(Author, '') AS author, COALESCE(Text, '') AS text \
     FROM Quotes ORDER BY Id OFFSET $1 ROWS FETCH NEXT 1 ROWS ONLY";

const FETCH_RANDOM_SQL: &str = "SELECT CAST(Id AS BIGINT) AS id, \
     COALESCE(Author, '') AS author, COALESCE(Text, '') AS text \
     FROM Quotes ORDER BY random() LIMIT 1";

const PING_SQL: &str = "SELECT 1";

#[derive(Clone)]
pub struct PgQuoteStore {
    pool: PgPool,
}

impl PgQuoteStore {
    /// Build a lazily connecting pool.
    ///
    /// Only the URL is validated here. Connections are opened on first use, so an
    /// unreachable database surfaces per request rather than at startup.
    pub fn connect_lazy(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect_lazy(url)?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl QuoteStore for PgQuoteStore {
    async fn count(&self) -> Result<u64, sqlx::Error> {
        let total: i64 = sqlx::query_scalar(COUNT_SQL)
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn fetch_at_offset(&self, offset: u64) -> Result<Option<Quote>, sqlx::Error> {
        let offset = i64::try_from(offset).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        sqlx::query_as::<_, Quote>(FETCH_AT_OFFSET_SQL)
            .bind(offset)
            .fetch_optional(&self.pool)
            .await
    }

    async fn fetch_random_ordered(&self) -> Result<Option<Quote>, sqlx::Error> {
        sqlx::query_as::<_, Quote>(FETCH_RANDOM_SQL)
            .fetch_optional(&self.pool)
            .await
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        let _: i32 = sqlx::query_scalar(PING_SQL).fetch_one(&self.pool).await?;
        Ok(())
    }
}
