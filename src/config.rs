//! Relay configuration loaded from environment variables.
//!
//! The only setting is the listening port, read from `PORT` (or a `.env`
//! file via `dotenvy`). Log verbosity is controlled separately through
//! `RUST_LOG`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::RelayError;

/// Port used when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 8080;

/// Environment variable holding the listening port.
const PORT_VAR: &str = "PORT";

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayConfig {
    /// Interface to bind. All interfaces unless overridden programmatically.
    pub host: IpAddr,

    /// TCP port to listen on. `0` lets the OS pick a free port.
    pub port: u16,
}

impl RelayConfig {
    /// Creates a configuration listening on all interfaces at `port`.
    #[must_use]
    pub const fn new(port: u16) -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port,
        }
    }

    /// Overrides the bind interface.
    #[must_use]
    pub const fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    /// Returns the socket address to bind.
    #[must_use]
    pub const fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Config`] if `PORT` is set but is not a valid
    /// port number.
    pub fn from_env() -> Result<Self, RelayError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Config`] if `PORT` is present but cannot be
    /// parsed as a `u16`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup(PORT_VAR) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                RelayError::Config(format!("{PORT_VAR}={raw:?} is not a valid port: {e}"))
            })?,
            None => DEFAULT_PORT,
        };
        Ok(Self::new(port))
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PORT)
    }
}
