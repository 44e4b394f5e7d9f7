//! Serve mode settings.
//!
//! Use `-P/--public` (interface `0.0.0.0`) to make the page reachable from the LAN.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde::Serialize;

/// Development server settings.
#[derive(Debug, Clone, Serialize)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// How long a `/__wait` request is parked before answering "current".
    pub wait_timeout: Duration,
}

impl ServeConfig {
    pub const DEFAULT_PORT: u16 = 8080;
    pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.interface, self.port)
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: Self::DEFAULT_PORT,
            wait_timeout: Self::DEFAULT_WAIT_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_config_defaults() {
        let config = ServeConfig::default();
        assert_eq!(config.interface, IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)));
        assert_eq!(config.port, 8080);
        assert_eq!(config.wait_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_serve_addr() {
        let config = ServeConfig {
            interface: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 4000,
            ..Default::default()
        };
        assert_eq!(config.addr().to_string(), "0.0.0.0:4000");
    }
}
