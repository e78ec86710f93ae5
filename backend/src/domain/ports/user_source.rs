//! Driven port for fetching batches of synthetic users from upstream.

use std::num::NonZeroUsize;

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::RecordBatch;

define_port_error! {
    /// Errors surfaced while fetching one batch.
    ///
    /// The variants keep the failure causes apart for logging; the fan-out
    /// aggregator treats all of them the same way and drops the batch.
    pub enum UserSourceError {
        /// The request never produced a response.
        Transport { message: String } =>
            "user source transport failed: {message}",
        /// The request exceeded its deadline.
        Timeout { message: String } =>
            "user source timed out: {message}",
        /// Upstream answered with a non-success status code.
        Status { status: u16, message: String } =>
            "user source returned status {status}: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "user source response decode failed: {message}",
    }
}

/// Port for requesting one batch of users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserSource: Send + Sync {
    /// Fetch exactly `batch_size` users in a single upstream call.
    ///
    /// Implementations perform no retries and hold no local state.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use std::num::NonZeroUsize;
    ///
    /// use roster::domain::ports::{FixtureUserSource, UserSource};
    ///
    /// # async fn demo() -> Result<(), roster::domain::ports::UserSourceError> {
    /// let batch_size = NonZeroUsize::new(10).expect("non-zero");
    /// let batch = FixtureUserSource.fetch_batch(batch_size).await?;
    /// assert!(batch.is_empty());
    /// # Ok(())
    /// # }
    /// ```
    async fn fetch_batch(&self, batch_size: NonZeroUsize) -> Result<RecordBatch, UserSourceError>;
}

/// Fixture implementation returning an empty batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureUserSource;

#[async_trait]
impl UserSource for FixtureUserSource {
    async fn fetch_batch(
        &self,
        _batch_size: NonZeroUsize,
    ) -> Result<RecordBatch, UserSourceError> {
        Ok(RecordBatch::new())
    }
}
