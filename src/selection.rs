//! Random quote selection.
//!
//! The default strategy never scans the table: it counts the rows, draws an offset
//! uniformly from `[0, total)` and fetches the single row at that offset in id order.
//! A row deleted between the count and the fetch shows up as
//! [`AppError::EmptyResult`], which the route reports as a 500.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::config::SelectionStrategy;
use crate::error::AppError;
use crate::store::{Quote, QuoteStore};

/// Outcome of a successful selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Found(Quote),
    /// The table has no rows.
    Empty,
}

/// Draw an offset uniformly from `[0, total)`. Returns `None` for an empty table.
pub fn pick_offset<R: Rng>(rng: &mut R, total: u64) -> Option<u64> {
    (total > 0).then(|| rng.gen_range(0..total))
}

/// Run a store call under `limit`, mapping both failure kinds into [`AppError`].
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(AppError::from),
        Err(_) => Err(AppError::Timeout(limit)),
    }
}

/// Select one quote from `store` using `strategy`. Every store call is bounded by `limit`.
pub async fn select_random_quote(
    store: &dyn QuoteStore,
    strategy: SelectionStrategy,
    limit: Duration,
) -> Result<Selection, AppError> {
    match strategy {
        SelectionStrategy::Offset => select_by_offset(store, limit).await,
        SelectionStrategy::RandomOrder => {
            let quote = with_timeout(limit, store.fetch_random_ordered()).await?;
            Ok(quote.map_or(Selection::Empty, Selection::Found))
        }
    }
}

async fn select_by_offset(store: &dyn QuoteStore, limit: Duration) -> Result<Selection, AppError> {
    let total = with_timeout(limit, store.count()).await?;

    // The generator must not live across an await.
    let Some(offset) = pick_offset(&mut rand::thread_rng(), total) else {
        return Ok(Selection::Empty);
    };
    tracing::debug!(total, offset, "Picked quote offset");

    match with_timeout(limit, store.fetch_at_offset(offset)).await? {
        Some(quote) => Ok(Selection::Found(quote)),
        None => Err(AppError::EmptyResult { offset, total }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Table whose count can disagree with its rows, to model concurrent deletes.
    struct FakeStore {
        rows: Vec<Quote>,
        reported_count: u64,
        fetches: AtomicUsize,
    }

    impl FakeStore {
        fn with_rows(n: i64) -> Self {
            let rows: Vec<Quote> = (1..=n)
                .map(|id| Quote {
                    id: id * 10,
                    author: format!("author {id}"),
                    text: format!("text {id}"),
                })
                .collect();
            Self {
                reported_count: rows.len() as u64,
                rows,
                fetches: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl QuoteStore for FakeStore {
        async fn count(&self) -> Result<u64, sqlx::Error> {
            Ok(self.reported_count)
        }

        async fn fetch_at_offset(&self, offset: u64) -> Result<Option<Quote>, sqlx::Error> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.rows.get(offset as usize).cloned())
        }

        async fn fetch_random_ordered(&self) -> Result<Option<Quote>, sqlx::Error> {
            Ok(self.rows.first().cloned())
        }

        async fn ping(&self) -> Result<(), sqlx::Error> {
            Ok(())
        }
    }

    const LIMIT: Duration = Duration::from_secs(5);

    #[test]
    fn test_pick_offset_empty_table() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(pick_offset(&mut rng, 0), None);
    }

    #[test]
    fn test_pick_offset_single_row() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(pick_offset(&mut rng, 1), Some(0));
        }
    }

    #[test]
    fn test_pick_offset_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for total in [2u64, 3, 17, 1000] {
            for _ in 0..1000 {
                let offset = pick_offset(&mut rng, total).unwrap();
                assert!(offset < total);
            }
        }
    }

    #[tokio::test]
    async fn test_empty_table_skips_fetch() {
        let store = FakeStore::with_rows(0);
        let selection = select_random_quote(&store, SelectionStrategy::Offset, LIMIT)
            .await
            .unwrap();
        assert_eq!(selection, Selection::Empty);
        assert_eq!(store.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_vanished_row_is_empty_result() {
        let mut store = FakeStore::with_rows(3);
        store.rows.clear();
        let err = select_random_quote(&store, SelectionStrategy::Offset, LIMIT)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EmptyResult { total: 3, .. }));
    }

    #[tokio::test]
    async fn test_selection_is_uniform() {
        const ROWS: usize = 5;
        const TRIALS: usize = 10_000;

        let store = FakeStore::with_rows(ROWS as i64);
        let mut counts = [0usize; ROWS];
        for _ in 0..TRIALS {
            match select_random_quote(&store, SelectionStrategy::Offset, LIMIT)
                .await
                .unwrap()
            {
                Selection::Found(quote) => {
                    let index = store.rows.iter().position(|row| row == &quote).unwrap();
                    counts[index] += 1;
                }
                Selection::Empty => panic!("table is not empty"),
            }
        }

        let expected = TRIALS as f64 / ROWS as f64;
        let chi_square: f64 = counts
            .iter()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();
        // Critical value for 4 degrees of freedom at p = 0.0001.
        assert!(chi_square < 23.51, "chi-square {chi_square} with counts {counts:?}");
    }

    #[tokio::test]
    async fn test_random_order_strategy() {
        let store = FakeStore::with_rows(2);
        let selection = select_random_quote(&store, SelectionStrategy::RandomOrder, LIMIT)
            .await
            .unwrap();
        assert_eq!(selection, Selection::Found(store.rows[0].clone()));

        let empty = FakeStore::with_rows(0);
        let selection = select_random_quote(&empty, SelectionStrategy::RandomOrder, LIMIT)
            .await
            .unwrap();
        assert_eq!(selection, Selection::Empty);
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let err = with_timeout(Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, sqlx::Error>(())
        })
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Timeout(_)));
    }
}
