//! Concurrent fan-out of upstream sub-fetches.
//!
//! One fetch cycle launches `requests` sub-fetches of `batch_size` users each,
//! one tokio task per sub-fetch, and waits for all of them. Failed batches
//! are dropped; the aggregator itself never fails.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{Instrument, Span, info, warn};

use super::UserRecord;
use super::ports::{UserSource, UserSourceError};

const DEFAULT_REQUESTS: NonZeroUsize = NonZeroUsize::new(3).expect("three is non-zero");
const DEFAULT_BATCH_SIZE: NonZeroUsize = NonZeroUsize::new(5000).expect("5000 is non-zero");

/// Fan-out shape for one fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanOutConfig {
    /// Number of concurrent sub-fetches.
    pub requests: NonZeroUsize,
    /// Users requested by each sub-fetch.
    pub batch_size: NonZeroUsize,
    /// Deadline applied to each sub-fetch. `None` waits for as long as the
    /// transport does.
    pub sub_fetch_timeout: Option<Duration>,
}

impl Default for FanOutConfig {
    fn default() -> Self {
        Self {
            requests: DEFAULT_REQUESTS,
            batch_size: DEFAULT_BATCH_SIZE,
            sub_fetch_timeout: None,
        }
    }
}

impl FanOutConfig {
    /// Users a fully successful cycle returns.
    pub fn target_total(&self) -> usize {
        self.requests.get().saturating_mul(self.batch_size.get())
    }
}

/// Merged result of one fan-out cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanOutOutcome {
    /// Records from every successful sub-fetch, in completion order.
    pub records: Vec<UserRecord>,
    /// Sub-fetches launched.
    pub requested: usize,
    /// Sub-fetches that contributed no records.
    pub failed: usize,
}

impl FanOutOutcome {
    /// Return whether every sub-fetch succeeded.
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Launches sub-fetches against a [`UserSource`] and merges their batches.
#[derive(Clone)]
pub struct FanOutAggregator {
    source: Arc<dyn UserSource>,
    config: FanOutConfig,
}

impl FanOutAggregator {
    /// Build an aggregator over `source`.
    pub fn new(source: Arc<dyn UserSource>, config: FanOutConfig) -> Self {
        Self { source, config }
    }

    /// Run one fan-out cycle.
    ///
    /// Waits for every sub-fetch to finish before merging; there is no early
    /// return on the first success or failure and no retry.
    ///
    /// # Examples
    /// ```rust,no_run
    /// use std::sync::Arc;
    ///
    /// use roster::domain::ports::FixtureUserSource;
    /// use roster::domain::{FanOutAggregator, FanOutConfig};
    ///
    /// # async fn demo() {
    /// let aggregator = FanOutAggregator::new(Arc::new(FixtureUserSource), FanOutConfig::default());
    /// let outcome = aggregator.collect().await;
    /// assert!(outcome.is_complete());
    /// # }
    /// ```
    pub async fn collect(&self) -> FanOutOutcome {
        let FanOutConfig {
            requests,
            batch_size,
            sub_fetch_timeout,
        } = self.config;
        info!(
            requests = requests.get(),
            batch_size = batch_size.get(),
            target_total = self.config.target_total(),
            "fetching users from upstream"
        );

        let mut tasks = JoinSet::new();
        for request_number in 1..=requests.get() {
            let source = Arc::clone(&self.source);
            let span = Span::current();
            tasks.spawn(
                async move {
                    info!(request_number, "sub-fetch started");
                    let result = fetch_with_deadline(&*source, batch_size, sub_fetch_timeout).await;
                    (request_number, result)
                }
                .instrument(span),
            );
        }

        // Grows from the batches that arrive; the configured total is unbounded.
        let mut records = Vec::new();
        let mut failed = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((request_number, Ok(batch))) => {
                    info!(request_number, received = batch.len(), "sub-fetch finished");
                    records.extend(batch);
                }
                Ok((request_number, Err(error))) => {
                    warn!(request_number, %error, "sub-fetch failed; dropping batch");
                    failed += 1;
                }
                Err(error) => {
                    warn!(%error, "sub-fetch task aborted; dropping batch");
                    failed += 1;
                }
            }
        }

        FanOutOutcome {
            records,
            requested: requests.get(),
            failed,
        }
    }
}

async fn fetch_with_deadline(
    source: &dyn UserSource,
    batch_size: NonZeroUsize,
    deadline: Option<Duration>,
) -> Result<Vec<UserRecord>, UserSourceError> {
    let Some(deadline) = deadline else {
        return source.fetch_batch(batch_size).await;
    };
    tokio::time::timeout(deadline, source.fetch_batch(batch_size))
        .await
        .unwrap_or_else(|_| {
            Err(UserSourceError::timeout(format!(
                "no response within {}ms",
                deadline.as_millis()
            )))
        })
}

#[cfg(test)]
#[path = "fan_out_tests.rs"]
mod tests;
