//! Client factory.
//!
//! [`DirectusEnvironment`] is the explicitly owned context every adapter is
//! built from. [`DirectusEnvironment::client`] binds a transport to the
//! credential a call selected.

use crate::http::HttpTransport;
use directus_composable_core::environment::{Clock, SystemClock};
use directus_composable_core::{
    DirectusConfig, DirectusError, InMemoryRefreshCookie, InMemorySessionStore,
    RefreshTokenCookie, RestRequest, Result, SessionStore, TokenSelection, Transport,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Dependencies shared by the Directus adapters.
///
/// # Type Parameters
///
/// - `T`: Transport executing requests
/// - `S`: Session store holding the current user and tokens
/// - `C`: Persisted refresh token cookie
pub struct DirectusEnvironment<T, S = InMemorySessionStore, C = InMemoryRefreshCookie> {
    transport: Arc<T>,
    config: DirectusConfig,
    session: S,
    cookie: C,
    clock: Arc<dyn Clock>,
}

impl DirectusEnvironment<HttpTransport> {
    /// Environment with an HTTP transport and in-memory session/cookie stores.
    ///
    /// # Errors
    ///
    /// Returns `DirectusError::InvalidConfig` if the HTTP transport cannot be
    /// built from `config`.
    pub fn from_config(config: DirectusConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::new(
            transport,
            config,
            InMemorySessionStore::new(),
            InMemoryRefreshCookie::new(),
        ))
    }
}

impl<T, S, C> DirectusEnvironment<T, S, C>
where
    T: Transport,
    S: SessionStore,
    C: RefreshTokenCookie,
{
    /// Create an environment using the system clock.
    #[must_use]
    pub fn new(transport: T, config: DirectusConfig, session: S, cookie: C) -> Self {
        Self {
            transport: Arc::new(transport),
            config,
            session,
            cookie,
            clock: Arc::new(SystemClock),
        }
    }

    /// Builder: replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Client configuration.
    #[must_use]
    pub const fn config(&self) -> &DirectusConfig {
        &self.config
    }

    /// Session store.
    #[must_use]
    pub const fn session(&self) -> &S {
        &self.session
    }

    /// Refresh token cookie.
    #[must_use]
    pub const fn cookie(&self) -> &C {
        &self.cookie
    }

    /// Clock.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Build a client authenticating with the selected token.
    ///
    /// - `Session` uses the session access token, or no token when signed out
    /// - `Static` uses the configured static token
    /// - `Explicit` uses the given token
    ///
    /// # Errors
    ///
    /// Returns `DirectusError::MissingStaticToken` when `Static` is selected
    /// and no static token is configured.
    pub fn client(&self, selection: TokenSelection) -> Result<DirectusRest<T>> {
        let bearer = match selection {
            TokenSelection::Session => self
                .session
                .load()
                .access_token()
                .map(str::to_string),
            TokenSelection::Static => Some(
                self.config
                    .static_token
                    .clone()
                    .ok_or(DirectusError::MissingStaticToken)?,
            ),
            TokenSelection::Explicit(token) => Some(token),
        };

        Ok(DirectusRest {
            transport: Arc::clone(&self.transport),
            bearer,
        })
    }

    /// Build a client that sends no token.
    ///
    /// Used for the `/auth/*` session endpoints, which the backend rejects when
    /// they carry an expired access token.
    #[must_use]
    pub fn anonymous(&self) -> DirectusRest<T> {
        DirectusRest {
            transport: Arc::clone(&self.transport),
            bearer: None,
        }
    }
}

impl<T, S: fmt::Debug, C: fmt::Debug> fmt::Debug for DirectusEnvironment<T, S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectusEnvironment")
            .field("url", &self.config.url)
            .field("session", &self.session)
            .field("cookie", &self.cookie)
            .finish_non_exhaustive()
    }
}

/// A transport bound to one credential.
pub struct DirectusRest<T> {
    transport: Arc<T>,
    bearer: Option<String>,
}

impl<T: Transport> DirectusRest<T> {
    /// Token this client authenticates with.
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.bearer.as_deref()
    }

    /// Perform a request and return the response `data`.
    ///
    /// # Errors
    ///
    /// Propagates transport errors unchanged.
    pub async fn request(&self, request: RestRequest) -> Result<Option<Value>> {
        self.transport.execute(request, self.bearer.clone()).await
    }

    /// Perform a request and deserialize the response `data`.
    ///
    /// An empty body deserializes from `null`, so `R = ()` accepts it.
    ///
    /// # Errors
    ///
    /// Propagates transport errors, or returns
    /// `DirectusError::ResponseParseFailed` if `data` does not match `R`.
    pub async fn request_as<R: DeserializeOwned>(&self, request: RestRequest) -> Result<R> {
        let data = self.request(request).await?.unwrap_or(Value::Null);
        serde_json::from_value(data).map_err(|e| DirectusError::ResponseParseFailed(e.to_string()))
    }
}

impl<T> fmt::Debug for DirectusRest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectusRest")
            .field("authenticated", &self.bearer.is_some())
            .finish_non_exhaustive()
    }
}
