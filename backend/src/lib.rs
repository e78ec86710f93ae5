//! Synthetic users service.
//!
//! Serves a large batch of random-user records with gender counts from a
//! single `/users` endpoint. Records come from a JSON snapshot when one is
//! present, otherwise from concurrent upstream sub-fetches whose merged
//! result becomes the next snapshot.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
