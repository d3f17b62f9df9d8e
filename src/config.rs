//! Server configuration
//!
//! Listen address and the location of the product file. The binary fills it
//! from command-line flags and `SHELF_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::Error;

/// Service configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    pub host: String,

    /// Port to bind to (default: 3000)
    pub port: u16,

    /// Product file, relative to the working directory (default: "db.json")
    pub db_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            db_path: PathBuf::from("db.json"),
        }
    }
}

impl ServerConfig {
    /// Resolve the socket address to listen on
    pub fn socket_addr(&self) -> Result<SocketAddr, Error> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| Error::Addr(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.db_path, PathBuf::from("db.json"));
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig { port: 8080, ..Default::default() };
        assert_eq!(config.socket_addr().unwrap(), "0.0.0.0:8080".parse().unwrap());
    }

    #[test]
    fn test_invalid_host() {
        let config = ServerConfig { host: "not a host".into(), ..Default::default() };
        assert!(matches!(config.socket_addr(), Err(Error::Addr(_))));
    }
}
