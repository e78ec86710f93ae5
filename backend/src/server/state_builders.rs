//! Builders wiring outbound adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use tracing::info;

use roster::domain::{FanOutAggregator, UserStatsService};
use roster::inbound::http::state::HttpState;
use roster::outbound::randomuser::RandomUserHttpSource;
use roster::outbound::snapshot::FileSnapshotStore;

use super::ServerConfig;

/// Build the shared HTTP state backed by the random-user API and the
/// snapshot file.
///
/// The HTTP client carries no overall deadline; the per sub-fetch timeout is
/// enforced by the fan-out aggregator.
///
/// # Errors
/// Returns [`std::io::Error`] when the HTTP client cannot be built or the
/// snapshot path does not name a file.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let source = RandomUserHttpSource::new(config.upstream_url.clone(), None)
        .map_err(|e| std::io::Error::other(format!("random-user client setup failed: {e}")))?;
    info!(endpoint = %source.endpoint(), "random-user source configured");
    let store =
        FileSnapshotStore::new(config.snapshot_path.clone()).map_err(std::io::Error::other)?;

    let aggregator = FanOutAggregator::new(Arc::new(source), config.fan_out);
    let service = UserStatsService::new(Arc::new(store), aggregator);
    Ok(web::Data::new(HttpState::new(Arc::new(service))))
}
