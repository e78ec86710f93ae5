//! Domain primitives and services.
//!
//! Purpose: define the user record, the fan-out fetch cycle, the statistics
//! view, and the snapshot-first pipeline tying them together. Everything here
//! talks to the outside world only through the traits in [`ports`].
//!
//! Public surface:
//! - [`UserRecord`] / [`Gender`]: immutable record shared by responses and
//!   snapshots.
//! - [`FanOutAggregator`]: concurrent upstream sub-fetches with merge.
//! - [`StatsReport`]: counts and elapsed time over one cycle's records.
//! - [`UserStatsService`]: the `/users` use-case.

mod fan_out;
pub mod ports;
mod stats;
mod user_record;
mod user_stats_service;

pub use self::fan_out::{FanOutAggregator, FanOutConfig, FanOutOutcome};
pub use self::stats::{ReportSource, StatsReport, format_execution_time};
pub use self::user_record::{Gender, RecordBatch, UserRecord, UserRecordFields};
pub use self::user_stats_service::UserStatsService;
