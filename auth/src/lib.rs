//! # Directus Composables: Authentication
//!
//! Login, token refresh, logout, password reset and user invites over the
//! Directus REST API, with the current user and tokens kept in an explicitly
//! owned session store.
//!
//! ## Session flow
//!
//! ```text
//! login / refresh_tokens
//!   → POST /auth/login | /auth/refresh   (anonymous)
//!   → GET  /users/me                     (new access token)
//!   → SessionStore::store(authenticated)
//!
//! logout
//!   → POST /auth/logout
//!   → SessionStore::store(cleared)
//! ```
//!
//! Refresh tokens are resolved from the explicit argument, then the session,
//! then the refresh token cookie.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod adapter;
pub mod options;

pub use adapter::DirectusAuth;
pub use options::{InviteOptions, LoginOptions};
