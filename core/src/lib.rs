//! # Directus Composables Core
//!
//! Shared types for the Directus adapters: configuration, the query
//! descriptor, REST request builders, session state and the traits the
//! adapters are generic over.
//!
//! ## Architecture
//!
//! ```text
//! Adapter (auth / items)
//!   │  builds
//!   ▼
//! RestRequest  ◄── commands::*  (pure, no I/O)
//!   │
//!   ▼
//! Transport::execute(request, bearer)   ◄── HttpTransport / MockTransport
//!   │
//!   ▼
//! SessionStore::store(next_state)       (login / refresh / logout only)
//! ```
//!
//! All external dependencies sit behind traits ([`Transport`],
//! [`SessionStore`], [`RefreshTokenCookie`], [`environment::Clock`]) so the
//! adapters run against in-memory implementations in tests.

pub mod commands;
pub mod config;
pub mod error;
pub mod query;
pub mod request;
pub mod session;
pub mod token;
pub mod transport;

pub use config::{AuthConfig, DirectusConfig};
pub use error::{ApiErrorEntry, DirectusError, Result};
pub use query::Query;
pub use request::{DeleteSelector, ItemId, Method, RestRequest};
pub use session::{
    AuthMode, AuthTokens, DirectusUser, InMemoryRefreshCookie, InMemorySessionStore,
    RefreshTokenCookie, SessionState, SessionStore,
};
pub use token::{ClientOptions, TokenSelection};
pub use transport::Transport;

/// Environment module - time source for token expiry
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
