//! HTTP server configuration object.

use std::net::SocketAddr;

use crate::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
///
/// # Examples
/// ```
/// use subscriptions_aggregator::server::ServerConfig;
///
/// let config = ServerConfig::new("127.0.0.1:3000".parse().expect("socket address"));
/// assert!(config.db_pool().is_none());
/// ```
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Configuration binding `bind_addr` with the in-memory store.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
        }
    }

    /// Attach a database pool; the Diesel adapters replace the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Socket address the server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Attached database pool, if any.
    #[must_use]
    pub fn db_pool(&self) -> Option<&DbPool> {
        self.db_pool.as_ref()
    }
}
