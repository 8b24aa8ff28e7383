//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use url::Url;

use crate::outbound::billing::CheckoutEndpoint;
use crate::outbound::persistence::DbPool;

const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) identity_endpoint: Option<Url>,
    pub(crate) checkout: Option<CheckoutEndpoint>,
    pub(crate) provider_timeout: Duration,
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
            db_pool: None,
            identity_endpoint: None,
            checkout: None,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, expenses and subscriptions use the Diesel-backed
    /// repositories; otherwise in-memory fixtures serve local development
    /// and tests.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach the identity provider's credential verification endpoint.
    ///
    /// Without it the fixture login service accepts only the built-in
    /// development credentials.
    #[must_use]
    pub fn with_identity_endpoint(mut self, endpoint: Url) -> Self {
        self.identity_endpoint = Some(endpoint);
        self
    }

    /// Attach the hosted checkout provider configuration.
    #[must_use]
    pub fn with_checkout(mut self, checkout: CheckoutEndpoint) -> Self {
        self.checkout = Some(checkout);
        self
    }

    /// Override the request timeout applied to outbound provider calls.
    #[must_use]
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
