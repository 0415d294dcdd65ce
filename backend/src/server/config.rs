//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::ports::UserRepository;

/// Upper bound on how long a graceful shutdown may take.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) users: Arc<dyn UserRepository>,
    pub(crate) shutdown_timeout: Duration,
}

impl ServerConfig {
    /// Construct a configuration serving `users` on `bind_addr`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, users: Arc<dyn UserRepository>) -> Self {
        Self {
            bind_addr,
            users,
            shutdown_timeout: SHUTDOWN_TIMEOUT,
        }
    }

    /// Override the graceful shutdown bound.
    #[must_use]
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Return the graceful shutdown bound.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }
}
