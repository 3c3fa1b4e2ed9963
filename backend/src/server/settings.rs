//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `SUBSCRIPTIONS_*` environment variables and
//! configuration files, in increasing order of precedence for flags.

use std::net::{AddrParseError, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
/// Conventional variable consulted when no prefixed database URL is set.
pub const DATABASE_URL_FALLBACK: &str = "DATABASE_URL";

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SUBSCRIPTIONS")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. Absent means the in-memory store.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Leave the schema untouched at startup.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
}

impl AppSettings {
    /// Configured bind address, defaulting to `0.0.0.0:3000`.
    ///
    /// # Errors
    ///
    /// Returns [`AddrParseError`] when the configured value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR).parse()
    }

    /// Configured database URL, falling back to `DATABASE_URL`.
    ///
    /// Blank values count as unset.
    pub fn database_url(&self) -> Option<String> {
        self.database_url
            .clone()
            .or_else(|| std::env::var(DATABASE_URL_FALLBACK).ok())
            .filter(|url| !url.trim().is_empty())
    }

    /// Pool size, defaulting to ten connections.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Whether pending migrations run before serving.
    pub fn run_migrations(&self) -> bool {
        !self.skip_migrations
    }
}
