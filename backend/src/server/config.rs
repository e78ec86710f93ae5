//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use roster::domain::FanOutConfig;
use roster::settings::{AppSettings, SettingsError};
use url::Url;

/// Validated configuration for creating the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) snapshot_path: PathBuf,
    pub(crate) upstream_url: Url,
    pub(crate) fan_out: FanOutConfig,
}

impl ServerConfig {
    /// Resolve loaded settings into a server configuration.
    ///
    /// # Errors
    /// Returns [`SettingsError`] when an address, URL, or count is invalid.
    pub fn from_settings(settings: &AppSettings) -> Result<Self, SettingsError> {
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            snapshot_path: settings.snapshot_path(),
            upstream_url: settings.upstream_url()?,
            fan_out: settings.fan_out_config()?,
        })
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
