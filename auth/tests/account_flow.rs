//! Password reset, invites and current-user reads.

#![allow(clippy::unwrap_used)] // Test code

use directus_composable_auth::{DirectusAuth, InviteOptions};
use directus_composable_core::{
    ApiErrorEntry, AuthTokens, ClientOptions, DirectusConfig, DirectusError, DirectusUser,
    InMemoryRefreshCookie, InMemorySessionStore, Method, Query, SessionState, SessionStore,
};
use directus_composable_rest::DirectusEnvironment;
use directus_composable_testing::{init_test_tracing, test_clock, MockTransport};
use serde_json::json;
use std::sync::Arc;

fn setup(
    config: DirectusConfig,
) -> (
    DirectusAuth<MockTransport, InMemorySessionStore, InMemoryRefreshCookie>,
    MockTransport,
    InMemorySessionStore,
) {
    init_test_tracing();
    let transport = MockTransport::new();
    let session = InMemorySessionStore::new();
    let env = DirectusEnvironment::new(
        transport.clone(),
        config,
        session.clone(),
        InMemoryRefreshCookie::new(),
    )
    .with_clock(test_clock());
    (DirectusAuth::new(Arc::new(env)), transport, session)
}

fn signed_in() -> SessionState {
    let user: DirectusUser =
        serde_json::from_value(json!({ "id": "u-1", "first_name": "Ada" })).unwrap();
    SessionState::default().authenticated(
        AuthTokens {
            access_token: "session-access".to_string(),
            refresh_token: Some("session-refresh".to_string()),
            expires: Some(900_000),
            expires_at: Some(1_735_690_500_000),
        },
        user,
    )
}

#[tokio::test]
async fn test_password_request_with_static_token() {
    let (auth, transport, _) = setup(DirectusConfig::default().with_static_token("admin-token"));
    transport.respond_empty(Method::Post, "/auth/password/request");

    auth.password_request(
        "ada@example.com",
        Some("https://app.example.com/reset"),
        ClientOptions::with_token(true),
    )
    .await
    .unwrap();

    let sent = transport.last_request().unwrap();
    assert_eq!(sent.bearer.as_deref(), Some("admin-token"));
    assert_eq!(
        sent.request.body,
        Some(json!({ "email": "ada@example.com", "reset_url": "https://app.example.com/reset" }))
    );
}

#[tokio::test]
async fn test_static_selection_without_configured_token_fails() {
    let (auth, transport, _) = setup(DirectusConfig::default());

    let result = auth
        .password_request("ada@example.com", None, ClientOptions::with_token(true))
        .await;

    assert_eq!(result, Err(DirectusError::MissingStaticToken));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_password_reset_sends_token_and_password() {
    let (auth, transport, _) = setup(DirectusConfig::default());
    transport.respond_empty(Method::Post, "/auth/password/reset");

    auth.password_reset("reset-jwt", "n3w-pass", ClientOptions::default())
        .await
        .unwrap();

    let sent = transport.last_request().unwrap();
    assert_eq!(sent.bearer, None);
    assert_eq!(
        sent.request.body,
        Some(json!({ "token": "reset-jwt", "password": "n3w-pass" }))
    );
}

#[tokio::test]
async fn test_invite_user_uses_session_token() {
    let (auth, transport, session) = setup(DirectusConfig::default());
    session.store(signed_in());
    transport.respond_empty(Method::Post, "/users/invite");

    auth.invite_user(
        "grace@example.com",
        "role-editor",
        InviteOptions::default().with_invite_url("https://app.example.com/accept"),
    )
    .await
    .unwrap();

    let sent = transport.last_request().unwrap();
    assert_eq!(sent.request.path, "/users/invite");
    assert_eq!(sent.bearer.as_deref(), Some("session-access"));
    assert_eq!(
        sent.request.body,
        Some(json!({
            "email": "grace@example.com",
            "role": "role-editor",
            "invite_url": "https://app.example.com/accept"
        }))
    );
}

#[tokio::test]
async fn test_invite_user_with_explicit_token() {
    let (auth, transport, session) = setup(DirectusConfig::default());
    session.store(signed_in());
    transport.respond_empty(Method::Post, "/users/invite");

    auth.invite_user(
        "grace@example.com",
        "role-editor",
        InviteOptions::default().with_token("other-token"),
    )
    .await
    .unwrap();

    assert_eq!(
        transport.last_request().unwrap().bearer.as_deref(),
        Some("other-token")
    );
}

#[tokio::test]
async fn test_accept_user_invite_failure_is_returned() {
    let (auth, transport, _) = setup(DirectusConfig::default());
    let error = DirectusError::Api {
        status: 400,
        message: "Invalid payload.".to_string(),
        errors: vec![ApiErrorEntry::new("Invalid payload.", "INVALID_PAYLOAD")],
    };
    transport.fail(Method::Post, "/users/invite/accept", error.clone());

    let result = auth
        .accept_user_invite("invite-jwt", "secret", ClientOptions::default())
        .await;

    let err = result.unwrap_err();
    assert_eq!(err, error);
    assert_eq!(err.errors()[0].code(), Some("INVALID_PAYLOAD"));
}

#[tokio::test]
async fn test_read_me_updates_user_and_keeps_tokens() {
    let (auth, transport, session) = setup(DirectusConfig::default());
    session.store(signed_in());
    transport.respond(
        Method::Get,
        "/users/me",
        json!({ "id": "u-1", "first_name": "Ada", "last_name": "Lovelace" }),
    );

    let query = Query::new().fields(["id", "first_name", "last_name"]);
    let user = auth.read_me(ClientOptions::default(), Some(&query)).await.unwrap();

    assert_eq!(user.last_name.as_deref(), Some("Lovelace"));
    assert_eq!(auth.user(), Some(user));
    assert_eq!(auth.tokens(), signed_in().tokens);

    let sent = transport.last_request().unwrap();
    assert_eq!(sent.bearer.as_deref(), Some("session-access"));
    assert_eq!(
        sent.request.params,
        vec![("fields".to_string(), "id,first_name,last_name".to_string())]
    );
}

#[tokio::test]
async fn test_read_me_failure_keeps_session() {
    let (auth, transport, session) = setup(DirectusConfig::default());
    session.store(signed_in());
    transport.fail(
        Method::Get,
        "/users/me",
        DirectusError::RequestFailed("timed out".to_string()),
    );

    let result = auth.read_me(ClientOptions::default(), None).await;

    assert!(matches!(result, Err(DirectusError::RequestFailed(_))));
    assert_eq!(session.load(), signed_in());
}
