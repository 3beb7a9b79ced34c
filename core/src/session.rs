//! Session state types and the stores that own them.
//!
//! [`SessionState`] is an immutable value: transitions return a new state and
//! the owning [`SessionStore`] swaps it in. Nothing here is global; the store
//! travels with the environment that the adapters are built from.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::{Arc, PoisonError, RwLock};

/// How the backend should hand out the refresh token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Refresh token returned in the JSON body.
    Json,
    /// Refresh token set as an httpOnly cookie by the backend.
    Cookie,
}

/// Access/refresh token pair with expiry metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    /// Short-lived access token.
    pub access_token: String,
    /// Refresh token (absent in cookie mode).
    pub refresh_token: Option<String>,
    /// Access token lifetime in milliseconds.
    pub expires: Option<i64>,
    /// Absolute access token expiry, epoch milliseconds.
    pub expires_at: Option<i64>,
}

/// The authenticated user as returned by `GET /users/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectusUser {
    /// User id (UUID).
    pub id: String,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// First name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Role id, or the expanded role object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Value>,
    /// Account status (`active`, `invited`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Every other field the backend returned.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Current user and tokens of one client session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Current user (set by login/refresh, cleared by logout).
    pub user: Option<DirectusUser>,
    /// Current tokens (set by login/refresh, cleared by logout).
    pub tokens: Option<AuthTokens>,
}

impl SessionState {
    /// State after a successful login or refresh.
    #[must_use]
    pub fn authenticated(self, tokens: AuthTokens, user: DirectusUser) -> Self {
        Self {
            user: Some(user),
            tokens: Some(tokens),
        }
    }

    /// State with the user replaced, tokens kept.
    #[must_use]
    pub fn with_user(self, user: DirectusUser) -> Self {
        Self {
            user: Some(user),
            ..self
        }
    }

    /// Signed-out state.
    #[must_use]
    pub fn cleared() -> Self {
        Self::default()
    }

    /// Access token, if signed in.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.tokens.as_ref().map(|t| t.access_token.as_str())
    }

    /// Refresh token held in the session, if any.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.tokens.as_ref().and_then(|t| t.refresh_token.as_deref())
    }
}

/// Owner of a [`SessionState`].
///
/// Adapters read a snapshot, compute the next state and store it. Callers are
/// responsible for not running login and logout concurrently on one store.
pub trait SessionStore: Send + Sync {
    /// Snapshot of the current state.
    fn load(&self) -> SessionState;

    /// Replace the current state.
    fn store(&self, state: SessionState);
}

/// In-memory session store.
///
/// Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    state: Arc<RwLock<SessionState>>,
}

impl InMemorySessionStore {
    /// Create an empty (signed-out) store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with a state.
    #[must_use]
    pub fn with_state(state: SessionState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self) -> SessionState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store(&self, state: SessionState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

/// Persisted refresh token (an application-managed cookie).
pub trait RefreshTokenCookie: Send + Sync {
    /// Current persisted value.
    fn get(&self) -> Option<String>;

    /// Persist a value, `None` removes the cookie.
    fn set(&self, value: Option<String>);
}

/// In-memory refresh token cookie.
///
/// Clones share the same value.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRefreshCookie {
    value: Arc<RwLock<Option<String>>>,
}

impl InMemoryRefreshCookie {
    /// Create an empty cookie.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cookie holding `value`.
    #[must_use]
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Arc::new(RwLock::new(Some(value.into()))),
        }
    }
}

impl RefreshTokenCookie for InMemoryRefreshCookie {
    fn get(&self) -> Option<String> {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, value: Option<String>) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = value;
    }
}
