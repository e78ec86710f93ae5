//! Service configuration loaded via OrthoConfig.
//!
//! Values come from `ROSTER_*` environment variables, an optional config
//! file, or CLI flags. Every field is optional; accessors fall back to the
//! defaults the service has always used (3 × 5000 users, `users_cache.json`,
//! port 8080, no sub-fetch deadline).

use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::FanOutConfig;
use crate::outbound::randomuser::DEFAULT_RANDOM_USER_ENDPOINT;
use crate::outbound::snapshot::DEFAULT_SNAPSHOT_FILE;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while validating loaded settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// A count that must be positive was zero.
    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },
    /// A value could not be parsed.
    #[error("invalid value for {name}='{value}': {message}")]
    Invalid {
        name: &'static str,
        value: String,
        message: String,
    },
}

/// Runtime settings for the users service.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ROSTER")]
pub struct AppSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<String>,
    /// Snapshot file location.
    pub snapshot_path: Option<PathBuf>,
    /// Random-user generator endpoint.
    pub upstream_url: Option<String>,
    /// Concurrent sub-fetches per fetch cycle.
    pub fan_out_requests: Option<usize>,
    /// Users requested by each sub-fetch.
    pub batch_size: Option<usize>,
    /// Per sub-fetch deadline in seconds; unset waits indefinitely.
    pub sub_fetch_timeout_secs: Option<u64>,
}

impl AppSettings {
    /// Resolve the listener address.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::Invalid {
            name: "bind_addr",
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Return the configured snapshot path, falling back to the default.
    pub fn snapshot_path(&self) -> PathBuf {
        self.snapshot_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_FILE))
    }

    /// Resolve the upstream endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] when the URL does not parse.
    pub fn upstream_url(&self) -> Result<Url, SettingsError> {
        let raw = self
            .upstream_url
            .as_deref()
            .unwrap_or(DEFAULT_RANDOM_USER_ENDPOINT);
        Url::parse(raw).map_err(|err| SettingsError::Invalid {
            name: "upstream_url",
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Per sub-fetch deadline, if configured.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Zero`] for a zero-second deadline.
    pub fn sub_fetch_timeout(&self) -> Result<Option<Duration>, SettingsError> {
        match self.sub_fetch_timeout_secs {
            None => Ok(None),
            Some(0) => Err(SettingsError::Zero {
                name: "sub_fetch_timeout_secs",
            }),
            Some(secs) => Ok(Some(Duration::from_secs(secs))),
        }
    }

    /// Build the fan-out shape from the configured counts.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Zero`] when a count or deadline is zero.
    pub fn fan_out_config(&self) -> Result<FanOutConfig, SettingsError> {
        let defaults = FanOutConfig::default();
        Ok(FanOutConfig {
            requests: positive("fan_out_requests", self.fan_out_requests, defaults.requests)?,
            batch_size: positive("batch_size", self.batch_size, defaults.batch_size)?,
            sub_fetch_timeout: self.sub_fetch_timeout()?,
        })
    }
}

fn positive(
    name: &'static str,
    configured: Option<usize>,
    default: NonZeroUsize,
) -> Result<NonZeroUsize, SettingsError> {
    match configured {
        None => Ok(default),
        Some(value) => NonZeroUsize::new(value).ok_or(SettingsError::Zero { name }),
    }
}
