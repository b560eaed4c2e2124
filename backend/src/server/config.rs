//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};

use crate::outbound::persistence::PoolConfig;

/// Storage backend selection for the persistence ports.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// PostgreSQL via the async connection pool.
    Postgres(PoolConfig),
    /// Single-file JSON store at the given path.
    JsonFile(PathBuf),
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) storage: Option<StorageConfig>,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            storage: None,
        }
    }

    /// Attach a storage backend for the persistence adapters.
    ///
    /// Without one the server runs on in-memory fixtures and loses all state
    /// on restart, which is only useful for tests and local experiments.
    #[must_use]
    pub fn with_storage(mut self, storage: StorageConfig) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
