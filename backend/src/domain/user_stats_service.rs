//! Request pipeline behind the `/users` endpoint.
//!
//! A cycle checks the snapshot first and only fans out to upstream when the
//! snapshot is absent or unreadable. Cycles are serialised by a lock so the
//! snapshot has a single writer and concurrent requests do not trigger
//! duplicate fetches.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::ports::{SnapshotStore, UserStatsQuery};
use super::{FanOutAggregator, ReportSource, StatsReport, format_execution_time};

/// Snapshot-first implementation of [`UserStatsQuery`].
pub struct UserStatsService {
    store: Arc<dyn SnapshotStore>,
    aggregator: FanOutAggregator,
    cycle_lock: Mutex<()>,
}

impl UserStatsService {
    /// Build a service over a snapshot store and an aggregator.
    ///
    /// ```rust,no_run
    /// use std::sync::Arc;
    ///
    /// use roster::domain::ports::{FixtureSnapshotStore, FixtureUserSource};
    /// use roster::domain::{FanOutAggregator, FanOutConfig, UserStatsService};
    ///
    /// let aggregator = FanOutAggregator::new(Arc::new(FixtureUserSource), FanOutConfig::default());
    /// let _service = UserStatsService::new(Arc::new(FixtureSnapshotStore), aggregator);
    /// ```
    pub fn new(store: Arc<dyn SnapshotStore>, aggregator: FanOutAggregator) -> Self {
        Self {
            store,
            aggregator,
            cycle_lock: Mutex::new(()),
        }
    }

    async fn run_cycle(&self) -> StatsReport {
        let started = Instant::now();
        let _cycle = self.cycle_lock.lock().await;

        match self.store.load().await {
            Ok(Some(records)) => {
                let report =
                    StatsReport::from_records(records, started.elapsed(), ReportSource::CacheHit);
                info!(
                    users = report.total_users(),
                    execution_time = %report.execution_time(),
                    "served users from snapshot"
                );
                return report;
            }
            Ok(None) => info!("no snapshot present; fetching from upstream"),
            Err(error) => warn!(%error, "snapshot unreadable; fetching from upstream"),
        }

        let outcome = self.aggregator.collect().await;
        let elapsed = started.elapsed();
        info!(
            users = outcome.records.len(),
            failed_fetches = outcome.failed,
            execution_time = %format_execution_time(elapsed),
            "finished collecting users"
        );

        if outcome.is_complete() && !outcome.records.is_empty() {
            if let Err(error) = self.store.save(&outcome.records).await {
                warn!(%error, "failed to persist snapshot; next request will refetch");
            }
        } else {
            warn!(
                failed_fetches = outcome.failed,
                requested = outcome.requested,
                "incomplete fetch cycle; snapshot left untouched"
            );
        }

        StatsReport::from_records(
            outcome.records,
            elapsed,
            ReportSource::Fetched {
                failed_fetches: outcome.failed,
            },
        )
    }
}

#[async_trait]
impl UserStatsQuery for UserStatsService {
    async fn user_stats(&self) -> StatsReport {
        self.run_cycle().await
    }
}

#[cfg(test)]
#[path = "user_stats_service_tests.rs"]
mod tests;
