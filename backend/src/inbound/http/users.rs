//! Users-with-stats endpoint.
//!
//! ```text
//! ANY /users
//! ```
//!
//! The endpoint always answers 200. Upstream and snapshot failures surface
//! only as a shorter `users` array; the `X-Users-Source` and
//! `X-Users-Failed-Fetches` headers let operators tell the cases apart
//! without changing the body shape.

use actix_web::http::header::{self, HeaderName};
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{StatsReport, UserRecord};
use crate::inbound::http::state::HttpState;

/// Header naming where the records came from (`cache` or `upstream`).
pub const USERS_SOURCE_HEADER: HeaderName = HeaderName::from_static("x-users-source");
/// Header counting sub-fetches that contributed no records.
pub const FAILED_FETCHES_HEADER: HeaderName = HeaderName::from_static("x-users-failed-fetches");

/// Response payload for `/users`.
#[derive(Debug, Serialize, ToSchema)]
pub struct UsersResponse {
    /// Every record served by this request.
    pub users: Vec<UserRecord>,
    /// Records whose gender is `male`.
    #[schema(example = 7512)]
    pub male_count: usize,
    /// Records whose gender is `female`.
    #[schema(example = 7488)]
    pub female_count: usize,
    /// Length of `users`.
    #[schema(example = 15000)]
    pub total_users: usize,
    /// Wall-clock time for the cycle.
    #[schema(example = "1.23 seconds")]
    pub execution_time: String,
}

impl From<StatsReport> for UsersResponse {
    fn from(report: StatsReport) -> Self {
        let male_count = report.male_count();
        let female_count = report.female_count();
        let total_users = report.total_users();
        let execution_time = report.execution_time();
        Self {
            users: report.into_users(),
            male_count,
            female_count,
            total_users,
            execution_time,
        }
    }
}

/// Return synthetic users with gender counts and timing.
///
/// Mounted for every method via `web::resource("/users").to(list_users)`.
#[utoipa::path(
    get,
    path = "/users",
    description = "Return the cached or freshly fetched user set with aggregate counts. Any HTTP method is accepted.",
    responses(
        (
            status = 200,
            description = "Users with statistics",
            headers(
                ("X-Users-Source" = String, description = "`cache` or `upstream`"),
                ("X-Users-Failed-Fetches" = u32, description = "Sub-fetches dropped this cycle")
            ),
            body = UsersResponse
        )
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
pub async fn list_users(state: web::Data<HttpState>) -> HttpResponse {
    let report = state.user_stats.user_stats().await;
    let source = report.source();
    let response = UsersResponse::from(report);
    info!(
        users = response.total_users,
        source = source.label(),
        execution_time = %response.execution_time,
        "served users with stats"
    );

    HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .insert_header((USERS_SOURCE_HEADER, source.label()))
        .insert_header((FAILED_FETCHES_HEADER, source.failed_fetches().to_string()))
        .json(response)
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
