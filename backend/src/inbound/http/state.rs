//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::UserStatsQuery;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub user_stats: Arc<dyn UserStatsQuery>,
}

impl HttpState {
    /// Construct state from the users query port.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use roster::domain::ports::FixtureUserStatsQuery;
    /// use roster::inbound::http::state::HttpState;
    ///
    /// let _state = HttpState::new(Arc::new(FixtureUserStatsQuery));
    /// ```
    pub fn new(user_stats: Arc<dyn UserStatsQuery>) -> Self {
        Self { user_stats }
    }
}
