//! Driving port used by inbound adapters to obtain the users report.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{ReportSource, StatsReport};

/// Use-case port producing the users-with-stats report.
///
/// The query never fails: upstream and snapshot problems degrade to a
/// smaller (possibly empty) record set.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStatsQuery: Send + Sync {
    /// Produce a fresh report for one request.
    async fn user_stats(&self) -> StatsReport;
}

/// Fixture query returning an empty, complete report.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureUserStatsQuery;

#[async_trait]
impl UserStatsQuery for FixtureUserStatsQuery {
    async fn user_stats(&self) -> StatsReport {
        StatsReport::from_records(
            Vec::new(),
            Duration::ZERO,
            ReportSource::Fetched { failed_fetches: 0 },
        )
    }
}
