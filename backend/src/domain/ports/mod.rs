//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod snapshot_store;
mod user_source;
mod user_stats_query;

#[cfg(test)]
pub use snapshot_store::MockSnapshotStore;
pub use snapshot_store::{FixtureSnapshotStore, SnapshotStore, SnapshotStoreError};
#[cfg(test)]
pub use user_source::MockUserSource;
pub use user_source::{FixtureUserSource, UserSource, UserSourceError};
#[cfg(test)]
pub use user_stats_query::MockUserStatsQuery;
pub use user_stats_query::{FixtureUserStatsQuery, UserStatsQuery};
