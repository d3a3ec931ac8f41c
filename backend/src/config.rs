//! Process settings loaded via OrthoConfig.
//!
//! Values are layered from CLI flags, `BACKOFFICE_*` environment variables
//! and configuration files; anything left unset falls back to the defaults
//! below.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

const DEFAULT_DATABASE_PATH: &str = "backoffice.sqlite3";
const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 8765));

/// Settings for the back-office server and its tools.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BACKOFFICE")]
pub struct BackofficeSettings {
    /// SQLite database file.
    pub database_path: Option<PathBuf>,
    /// Loopback address the command endpoint listens on.
    pub bind_addr: Option<SocketAddr>,
    /// Maximum pooled connections.
    #[ortho_config(default = 4)]
    pub pool_size: u32,
    /// Seconds to wait for a pooled connection.
    #[ortho_config(default = 30)]
    pub connect_timeout_secs: u64,
}

impl BackofficeSettings {
    /// Return the configured database file, falling back to the default.
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH))
    }

    /// Return the configured listen address, falling back to the default.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Connection checkout timeout.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Pool settings derived from these values.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new(self.database_path().display().to_string())
            .with_max_size(self.pool_size)
            .with_connection_timeout(self.connect_timeout())
    }
}
