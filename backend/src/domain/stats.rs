//! Aggregate statistics rendered alongside the user records.

use std::time::Duration;

use super::{Gender, UserRecord};

/// Where the records of a report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSource {
    /// Records were loaded from the persisted snapshot.
    CacheHit,
    /// Records were fetched from upstream in this cycle.
    Fetched {
        /// Number of sub-fetches that contributed nothing.
        failed_fetches: usize,
    },
}

impl ReportSource {
    /// Return whether every record the cycle asked for was obtained.
    pub fn is_complete(self) -> bool {
        match self {
            Self::CacheHit => true,
            Self::Fetched { failed_fetches } => failed_fetches == 0,
        }
    }

    /// Short label used in response headers and logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::CacheHit => "cache",
            Self::Fetched { .. } => "upstream",
        }
    }

    /// Number of failed sub-fetches; zero for cache hits.
    pub fn failed_fetches(self) -> usize {
        match self {
            Self::CacheHit => 0,
            Self::Fetched { failed_fetches } => failed_fetches,
        }
    }
}

/// Read-only view over one cycle's records.
///
/// ## Invariants
/// - `total_users() == users().len()`.
/// - `male_count() + female_count() <= total_users()`; records with an
///   unrecognised gender count towards neither category.
///
/// # Examples
/// ```
/// use std::time::Duration;
///
/// use roster::domain::{ReportSource, StatsReport};
///
/// let report = StatsReport::from_records(Vec::new(), Duration::from_millis(1234), ReportSource::CacheHit);
/// assert_eq!(report.total_users(), 0);
/// assert_eq!(report.execution_time(), "1.23 seconds");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsReport {
    users: Vec<UserRecord>,
    male_count: usize,
    female_count: usize,
    elapsed: Duration,
    source: ReportSource,
}

impl StatsReport {
    /// Count genders in a single pass and capture the elapsed time.
    pub fn from_records(users: Vec<UserRecord>, elapsed: Duration, source: ReportSource) -> Self {
        let (male_count, female_count) =
            users
                .iter()
                .fold((0, 0), |(male, female), user| match user.gender() {
                    Gender::Male => (male + 1, female),
                    Gender::Female => (male, female + 1),
                    Gender::Other(_) => (male, female),
                });
        Self {
            users,
            male_count,
            female_count,
            elapsed,
            source,
        }
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn male_count(&self) -> usize {
        self.male_count
    }

    pub fn female_count(&self) -> usize {
        self.female_count
    }

    pub fn total_users(&self) -> usize {
        self.users.len()
    }

    pub fn source(&self) -> ReportSource {
        self.source
    }

    /// Elapsed time in seconds with two decimals, e.g. `"1.23 seconds"`.
    pub fn execution_time(&self) -> String {
        format_execution_time(self.elapsed)
    }

    /// Move the records out of the report.
    pub fn into_users(self) -> Vec<UserRecord> {
        self.users
    }
}

/// Render a duration the way the `execution_time` field reports it.
pub fn format_execution_time(elapsed: Duration) -> String {
    format!("{:.2} seconds", elapsed.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRecordFields;
    use rstest::rstest;

    fn user(gender: &str, uuid: &str) -> UserRecord {
        UserRecord::new(UserRecordFields {
            gender: gender.to_owned(),
            uuid: uuid.to_owned(),
            ..UserRecordFields::default()
        })
    }

    #[test]
    fn empty_records_yield_zero_counts() {
        let report = StatsReport::from_records(
            Vec::new(),
            Duration::ZERO,
            ReportSource::Fetched { failed_fetches: 3 },
        );
        assert_eq!(report.total_users(), 0);
        assert_eq!(report.male_count(), 0);
        assert_eq!(report.female_count(), 0);
        assert_eq!(report.execution_time(), "0.00 seconds");
    }

    #[test]
    fn unrecognised_genders_count_towards_total_only() {
        let users = vec![
            user("male", "1"),
            user("female", "2"),
            user("female", "3"),
            user("unknown", "4"),
        ];
        let report = StatsReport::from_records(users, Duration::ZERO, ReportSource::CacheHit);

        assert_eq!(report.male_count(), 1);
        assert_eq!(report.female_count(), 2);
        assert_eq!(report.total_users(), 4);
        assert!(report.male_count() + report.female_count() <= report.total_users());
    }

    #[test]
    fn keeps_records_in_the_order_given() {
        let users = vec![user("male", "a"), user("female", "b"), user("male", "c")];
        let report = StatsReport::from_records(users, Duration::ZERO, ReportSource::CacheHit);
        let ids: Vec<&str> = report.users().iter().map(UserRecord::uuid).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[rstest]
    #[case(Duration::from_millis(1234), "1.23 seconds")]
    #[case(Duration::from_millis(5), "0.01 seconds")]
    #[case(Duration::from_secs(12), "12.00 seconds")]
    #[case(Duration::from_micros(4_999), "0.00 seconds")]
    fn formats_elapsed_time_with_two_decimals(#[case] elapsed: Duration, #[case] expected: &str) {
        assert_eq!(format_execution_time(elapsed), expected);
    }

    #[rstest]
    #[case(ReportSource::CacheHit, true, "cache", 0)]
    #[case(ReportSource::Fetched { failed_fetches: 0 }, true, "upstream", 0)]
    #[case(ReportSource::Fetched { failed_fetches: 1 }, false, "upstream", 1)]
    fn report_source_describes_the_cycle(
        #[case] source: ReportSource,
        #[case] complete: bool,
        #[case] label: &str,
        #[case] failed: usize,
    ) {
        assert_eq!(source.is_complete(), complete);
        assert_eq!(source.label(), label);
        assert_eq!(source.failed_fetches(), failed);
    }
}
