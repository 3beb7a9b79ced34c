//! Authentication adapter.

use crate::options::{InviteOptions, LoginOptions};
use directus_composable_core::{
    commands, AuthMode, AuthTokens, ClientOptions, DirectusError, DirectusUser, Query,
    RefreshTokenCookie, RestRequest, Result, SessionState, SessionStore, TokenSelection, Transport,
};
use directus_composable_rest::DirectusEnvironment;
use serde::Deserialize;
use std::sync::Arc;

/// Body of a successful `/auth/login` or `/auth/refresh` call.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    access_token: String,
    #[serde(default)]
    expires: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Login, token refresh, logout, password reset and user invites.
///
/// Login and refresh write the current user and tokens into the session
/// store; logout clears them. Every operation logs its failure once with a
/// fixed message and returns it to the caller.
///
/// # Example
///
/// ```no_run
/// use directus_composable_auth::{DirectusAuth, LoginOptions};
/// use directus_composable_core::DirectusConfig;
/// use directus_composable_rest::DirectusEnvironment;
/// use std::sync::Arc;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let env = Arc::new(DirectusEnvironment::from_config(DirectusConfig::from_env()?)?);
/// let auth = DirectusAuth::new(env);
///
/// let tokens = auth.login("ada@example.com", "secret", LoginOptions::default()).await?;
/// println!("signed in until {:?}", tokens.expires_at);
/// # Ok(())
/// # }
/// ```
pub struct DirectusAuth<T, S, C> {
    env: Arc<DirectusEnvironment<T, S, C>>,
}

impl<T, S, C> Clone for DirectusAuth<T, S, C> {
    fn clone(&self) -> Self {
        Self {
            env: Arc::clone(&self.env),
        }
    }
}

impl<T, S, C> DirectusAuth<T, S, C>
where
    T: Transport,
    S: SessionStore,
    C: RefreshTokenCookie,
{
    /// Create the adapter.
    #[must_use]
    pub const fn new(env: Arc<DirectusEnvironment<T, S, C>>) -> Self {
        Self { env }
    }

    /// Current user, if signed in.
    #[must_use]
    pub fn user(&self) -> Option<DirectusUser> {
        self.env.session().load().user
    }

    /// Current tokens, if signed in.
    #[must_use]
    pub fn tokens(&self) -> Option<AuthTokens> {
        self.env.session().load().tokens
    }

    /// Sign in with email and password.
    ///
    /// On success the session holds the returned tokens and the user read
    /// with the new access token.
    ///
    /// # Errors
    ///
    /// Returns the backend or transport error of the login or the
    /// current-user read. The session is left unchanged.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        options: LoginOptions,
    ) -> Result<AuthTokens> {
        self.try_login(email, password, options)
            .await
            .inspect_err(|e| e.log_failure("Couldn't login user"))
    }

    async fn try_login(
        &self,
        email: &str,
        password: &str,
        options: LoginOptions,
    ) -> Result<AuthTokens> {
        let mode = options.mode.unwrap_or_else(|| self.default_mode());
        let response: AuthResponse = self
            .env
            .anonymous()
            .request_as(commands::login(email, password, mode, options.otp.as_deref()))
            .await?;

        self.establish(response, mode).await
    }

    /// Exchange a refresh token for a new token pair.
    ///
    /// The refresh token is taken from `refresh_token`, else the session,
    /// else the refresh token cookie.
    ///
    /// # Errors
    ///
    /// Returns `DirectusError::MissingRefreshToken` in `json` mode when no
    /// refresh token can be found (no request is sent), otherwise the backend
    /// or transport error. The session is left unchanged.
    pub async fn refresh_tokens(
        &self,
        refresh_token: Option<&str>,
        mode: Option<AuthMode>,
    ) -> Result<AuthTokens> {
        self.try_refresh(refresh_token, mode)
            .await
            .inspect_err(|e| e.log_failure("Couldn't refresh tokens"))
    }

    async fn try_refresh(
        &self,
        refresh_token: Option<&str>,
        mode: Option<AuthMode>,
    ) -> Result<AuthTokens> {
        let mode = mode.unwrap_or_else(|| self.default_mode());
        let token = self.required_refresh_token(refresh_token, mode)?;

        let response: AuthResponse = self
            .env
            .anonymous()
            .request_as(commands::refresh(mode, token.as_deref()))
            .await?;

        self.establish(response, mode).await
    }

    /// End the session.
    ///
    /// `mode` should match the mode the session was established with; it
    /// defaults to the configured mode. On success the session and the
    /// refresh token cookie are cleared.
    ///
    /// # Errors
    ///
    /// Returns `DirectusError::MissingRefreshToken` in `json` mode when no
    /// refresh token can be found, otherwise the backend or transport error.
    /// The session is left unchanged.
    pub async fn logout(&self, refresh_token: Option<&str>, mode: Option<AuthMode>) -> Result<()> {
        self.try_logout(refresh_token, mode)
            .await
            .inspect_err(|e| e.log_failure("Couldn't logout user"))
    }

    async fn try_logout(&self, refresh_token: Option<&str>, mode: Option<AuthMode>) -> Result<()> {
        let mode = mode.unwrap_or_else(|| self.default_mode());
        let token = self.required_refresh_token(refresh_token, mode)?;

        self.env
            .anonymous()
            .request(commands::logout(mode, token.as_deref()))
            .await?;

        self.env.session().store(SessionState::cleared());
        self.env.cookie().set(None);
        tracing::info!("Directus session ended");
        Ok(())
    }

    /// Ask the backend to email a password reset link.
    ///
    /// # Errors
    ///
    /// Returns the backend or transport error.
    pub async fn password_request(
        &self,
        email: &str,
        reset_url: Option<&str>,
        options: ClientOptions,
    ) -> Result<()> {
        self.send(&options, commands::password_request(email, reset_url))
            .await
            .inspect_err(|e| e.log_failure("Couldn't request password reset"))
    }

    /// Set a new password using a reset token.
    ///
    /// # Errors
    ///
    /// Returns the backend or transport error.
    pub async fn password_reset(
        &self,
        token: &str,
        password: &str,
        options: ClientOptions,
    ) -> Result<()> {
        self.send(&options, commands::password_reset(token, password))
            .await
            .inspect_err(|e| e.log_failure("Couldn't reset password"))
    }

    /// Invite a new user by email.
    ///
    /// # Errors
    ///
    /// Returns the backend or transport error.
    pub async fn invite_user(&self, email: &str, role: &str, options: InviteOptions) -> Result<()> {
        let client_options = ClientOptions {
            token: options.token,
        };
        self.send(
            &client_options,
            commands::invite_user(email, role, options.invite_url.as_deref()),
        )
        .await
        .inspect_err(|e| e.log_failure("Couldn't invite user"))
    }

    /// Accept an invite and set the account password.
    ///
    /// # Errors
    ///
    /// Returns the backend or transport error.
    pub async fn accept_user_invite(
        &self,
        token: &str,
        password: &str,
        options: ClientOptions,
    ) -> Result<()> {
        self.send(&options, commands::accept_user_invite(token, password))
            .await
            .inspect_err(|e| e.log_failure("Couldn't accept user invite"))
    }

    /// Re-read the current user and store it in the session.
    ///
    /// # Errors
    ///
    /// Returns the backend or transport error. The session is left unchanged.
    pub async fn read_me(&self, options: ClientOptions, query: Option<&Query>) -> Result<DirectusUser> {
        self.try_read_me(&options, query)
            .await
            .inspect_err(|e| e.log_failure("Couldn't read current user"))
    }

    async fn try_read_me(&self, options: &ClientOptions, query: Option<&Query>) -> Result<DirectusUser> {
        let user: DirectusUser = self
            .env
            .client(options.selection_or(&TokenSelection::Session))?
            .request_as(commands::read_me(query))
            .await?;

        let next = self.env.session().load().with_user(user.clone());
        self.env.session().store(next);
        Ok(user)
    }

    fn default_mode(&self) -> AuthMode {
        self.env.config().auth.default_mode()
    }

    /// Refresh token by precedence: argument, session, cookie.
    fn resolve_refresh_token(&self, explicit: Option<&str>) -> Option<String> {
        explicit
            .map(str::to_string)
            .or_else(|| self.env.session().load().refresh_token().map(str::to_string))
            .or_else(|| self.env.cookie().get())
    }

    fn required_refresh_token(
        &self,
        explicit: Option<&str>,
        mode: AuthMode,
    ) -> Result<Option<String>> {
        let token = self.resolve_refresh_token(explicit);
        if mode == AuthMode::Json && token.is_none() {
            return Err(DirectusError::MissingRefreshToken);
        }
        Ok(token)
    }

    async fn send(&self, options: &ClientOptions, request: RestRequest) -> Result<()> {
        self.env
            .client(options.selection_or(&TokenSelection::Session))?
            .request(request)
            .await
            .map(|_| ())
    }

    /// Read the user with fresh tokens, then swap the session in one step.
    async fn establish(&self, response: AuthResponse, mode: AuthMode) -> Result<AuthTokens> {
        let now_ms = self.env.clock().now().timestamp_millis();
        let tokens = AuthTokens {
            expires_at: response.expires.map(|ms| now_ms + ms),
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires: response.expires,
        };

        let user: DirectusUser = self
            .env
            .client(TokenSelection::Explicit(tokens.access_token.clone()))?
            .request_as(commands::read_me(None))
            .await?;

        tracing::info!(user_id = %user.id, ?mode, "Directus session established");

        let next = self.env.session().load().authenticated(tokens.clone(), user);
        self.env.session().store(next);

        if mode == AuthMode::Json {
            if let Some(refresh_token) = &tokens.refresh_token {
                self.env.cookie().set(Some(refresh_token.clone()));
            }
        }

        Ok(tokens)
    }
}
