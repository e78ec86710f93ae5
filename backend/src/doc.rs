//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the users endpoint, the health probes, and the
//! response schemas. The document backs Swagger UI in debug builds and is
//! printed by the `openapi-dump` binary.

use utoipa::OpenApi;

use crate::domain::UserRecord;
use crate::inbound::http::users::UsersResponse;

/// OpenAPI document for the HTTP API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Roster users API",
        description = "Synthetic user records with gender counts, cached between requests."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(UsersResponse, UserRecord)),
    tags(
        (name = "users", description = "Synthetic users and aggregate statistics"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
