//! Options for the authentication operations.
//!
//! Each struct lists every option an operation recognises. Unset members fall
//! back to the configured defaults one by one.

use directus_composable_core::{AuthMode, TokenSelection};
use serde::Deserialize;

/// Options for [`crate::DirectusAuth::login`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoginOptions {
    /// Refresh token delivery mode.
    ///
    /// Default: derived from `AuthConfig::use_app_cookies`
    pub mode: Option<AuthMode>,

    /// One-time password for accounts with 2FA enabled.
    ///
    /// Default: none
    pub otp: Option<String>,
}

impl LoginOptions {
    /// Set the mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: AuthMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Set the one-time password.
    #[must_use]
    pub fn with_otp(mut self, otp: impl Into<String>) -> Self {
        self.otp = Some(otp.into());
        self
    }
}

/// Options for [`crate::DirectusAuth::invite_user`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InviteOptions {
    /// URL the invite email links to (must be allow-listed by the backend).
    ///
    /// Default: the backend's own accept page
    pub invite_url: Option<String>,

    /// Token override for this call.
    ///
    /// Default: the session token
    pub token: Option<TokenSelection>,
}

impl InviteOptions {
    /// Set the invite URL.
    #[must_use]
    pub fn with_invite_url(mut self, url: impl Into<String>) -> Self {
        self.invite_url = Some(url.into());
        self
    }

    /// Set the token selection.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<TokenSelection>) -> Self {
        self.token = Some(token.into());
        self
    }
}
