//! Reqwest-backed random-user source adapter.
//!
//! This adapter owns transport details only: query construction, timeout and
//! HTTP error mapping, and JSON decoding into domain records.

use std::num::NonZeroUsize;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::RandomUserResponseDto;
use crate::domain::RecordBatch;
use crate::domain::ports::{UserSource, UserSourceError};

/// Default public endpoint of the random-user generator.
pub const DEFAULT_RANDOM_USER_ENDPOINT: &str = "https://randomuser.me/api/";

const DEFAULT_USER_AGENT: &str = concat!("roster/", env!("CARGO_PKG_VERSION"));
/// Field projection requested from upstream.
const INCLUDED_FIELDS: &str = "gender,name,email,location,login";

/// Random-user source issuing one HTTP GET per batch.
pub struct RandomUserHttpSource {
    client: Client,
    endpoint: Url,
}

impl RandomUserHttpSource {
    /// Build an adapter; `timeout` bounds each whole request when set.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let builder = Client::builder().user_agent(DEFAULT_USER_AGENT);
        let builder = match timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        };
        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    /// Endpoint this adapter queries.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl UserSource for RandomUserHttpSource {
    async fn fetch_batch(&self, batch_size: NonZeroUsize) -> Result<RecordBatch, UserSourceError> {
        let url = build_batch_url(&self.endpoint, batch_size);
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_batch(body.as_ref())
    }
}

fn build_batch_url(endpoint: &Url, batch_size: NonZeroUsize) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("results", &batch_size.to_string())
        .append_pair("inc", INCLUDED_FIELDS)
        .append_key_only("noinfo");
    url
}

fn parse_batch(body: &[u8]) -> Result<RecordBatch, UserSourceError> {
    let decoded: RandomUserResponseDto = serde_json::from_slice(body).map_err(|error| {
        UserSourceError::decode(format!("invalid random-user JSON payload: {error}"))
    })?;
    Ok(decoded.into_batch())
}

fn map_transport_error(error: reqwest::Error) -> UserSourceError {
    if error.is_timeout() {
        UserSourceError::timeout(error.to_string())
    } else if error.is_decode() {
        UserSourceError::decode(error.to_string())
    } else {
        UserSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> UserSourceError {
    UserSourceError::status(status.as_u16(), body_preview(body))
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 120;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if compact.chars().count() <= PREVIEW_CHAR_LIMIT {
        return compact;
    }
    let mut preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
    preview.push_str("...");
    preview
}
