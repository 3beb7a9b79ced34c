//! Item operations against a scripted transport.

#![allow(clippy::unwrap_used)] // Test code

use directus_composable_core::{
    AuthTokens, ClientOptions, DeleteSelector, DirectusConfig, DirectusError, DirectusUser,
    InMemoryRefreshCookie, InMemorySessionStore, ItemId, Method, Query, SessionState,
    TokenSelection,
};
use directus_composable_items::{DirectusItems, ItemsOptions};
use directus_composable_rest::DirectusEnvironment;
use directus_composable_testing::{init_test_tracing, LogCapture, MockTransport};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

type TestItems = DirectusItems<MockTransport, InMemorySessionStore, InMemoryRefreshCookie>;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Post {
    id: i64,
    title: String,
}

#[derive(Serialize)]
struct NewPost<'a> {
    title: &'a str,
}

fn setup() -> (TestItems, MockTransport) {
    init_test_tracing();
    let transport = MockTransport::new();
    let user: DirectusUser = serde_json::from_value(json!({ "id": "u-1" })).unwrap();
    let session = InMemorySessionStore::with_state(SessionState::default().authenticated(
        AuthTokens {
            access_token: "session-access".to_string(),
            refresh_token: None,
            expires: None,
            expires_at: None,
        },
        user,
    ));
    let env = DirectusEnvironment::new(
        transport.clone(),
        DirectusConfig::default().with_static_token("static-token"),
        session,
        InMemoryRefreshCookie::new(),
    );
    (DirectusItems::new(Arc::new(env)), transport)
}

fn forbidden() -> DirectusError {
    DirectusError::Api {
        status: 403,
        message: "You don't have permission to access this.".to_string(),
        errors: vec![],
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Create / read / update
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_create_item_returns_typed_data() {
    let (items, transport) = setup();
    transport.respond(
        Method::Post,
        "/items/posts",
        json!({ "id": 1, "title": "Hello" }),
    );

    let post: Post = items
        .create_item("posts", &NewPost { title: "Hello" }, ItemsOptions::default())
        .await
        .unwrap();

    assert_eq!(post, Post { id: 1, title: "Hello".to_string() });
    let sent = transport.last_request().unwrap();
    assert_eq!(sent.request.body, Some(json!({ "title": "Hello" })));
    assert_eq!(sent.bearer.as_deref(), Some("session-access"));
}

#[tokio::test]
async fn test_create_items_sends_array() {
    let (items, transport) = setup();
    transport.respond(
        Method::Post,
        "/items/posts",
        json!([{ "id": 1, "title": "a" }, { "id": 2, "title": "b" }]),
    );

    let created: Vec<Post> = items
        .create_items(
            "posts",
            &[NewPost { title: "a" }, NewPost { title: "b" }],
            ItemsOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(created.len(), 2);
    assert_eq!(
        transport.last_request().unwrap().request.body,
        Some(json!([{ "title": "a" }, { "title": "b" }]))
    );
}

#[tokio::test]
async fn test_read_items_forwards_query() {
    let (items, transport) = setup();
    transport.respond(Method::Get, "/items/posts", json!([{ "id": 3, "title": "c" }]));

    let query = Query::new()
        .filter(json!({ "status": { "_eq": "published" } }))
        .sort(["-id"])
        .limit(1);
    let posts: Vec<Post> = items
        .read_items("posts", ItemsOptions::with_query(query.clone()))
        .await
        .unwrap();

    assert_eq!(posts, vec![Post { id: 3, title: "c".to_string() }]);
    assert_eq!(transport.last_request().unwrap().request.params, query.to_params());
}

#[tokio::test]
async fn test_read_item_by_string_key() {
    let (items, transport) = setup();
    transport.respond(Method::Get, "/items/pages/about", json!({ "slug": "about" }));

    let page: Value = items
        .read_item("pages", "about", ItemsOptions::default())
        .await
        .unwrap();

    assert_eq!(page, json!({ "slug": "about" }));
}

#[tokio::test]
async fn test_read_singleton() {
    let (items, transport) = setup();
    transport.respond(Method::Get, "/items/settings", json!({ "site_name": "Acme" }));

    let settings: Value = items
        .read_singleton("settings", ItemsOptions::default())
        .await
        .unwrap();

    assert_eq!(settings["site_name"], "Acme");
}

#[tokio::test]
async fn test_update_item_and_items() {
    let (items, transport) = setup();
    transport
        .respond(Method::Patch, "/items/posts/1", json!({ "id": 1, "title": "New" }))
        .respond(
            Method::Patch,
            "/items/posts",
            json!([{ "id": 1, "title": "New" }, { "id": 2, "title": "New" }]),
        );

    let post: Post = items
        .update_item("posts", 1_i64, &json!({ "title": "New" }), ItemsOptions::default())
        .await
        .unwrap();
    assert_eq!(post.title, "New");

    let keys = [ItemId::Int(1), ItemId::Int(2)];
    let posts: Vec<Post> = items
        .update_items("posts", &keys, &json!({ "title": "New" }), ItemsOptions::default())
        .await
        .unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(
        transport.last_request().unwrap().request.body,
        Some(json!({ "keys": [1, 2], "data": { "title": "New" } }))
    );
}

#[tokio::test]
async fn test_update_singleton() {
    let (items, transport) = setup();
    transport.respond(Method::Patch, "/items/settings", json!({ "site_name": "Renamed" }));

    let settings: Value = items
        .update_singleton("settings", &json!({ "site_name": "Renamed" }), ItemsOptions::default())
        .await
        .unwrap();

    assert_eq!(settings["site_name"], "Renamed");
}

// ═══════════════════════════════════════════════════════════════════════
// Delete
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_delete_item() {
    let (items, transport) = setup();
    transport.respond_empty(Method::Delete, "/items/posts/9");

    items
        .delete_item("posts", 9_i64, ClientOptions::default())
        .await
        .unwrap();

    let sent = transport.last_request().unwrap();
    assert_eq!(sent.request.method, Method::Delete);
    assert_eq!(sent.request.body, None);
}

#[tokio::test]
async fn test_delete_items_forwards_keys() {
    let (items, transport) = setup();
    transport.respond_empty(Method::Delete, "/items/posts");

    items
        .delete_items("posts", DeleteSelector::keys([1_i64, 2, 3]), ClientOptions::default())
        .await
        .unwrap();

    assert_eq!(
        transport.last_request().unwrap().request.body,
        Some(json!([1, 2, 3]))
    );
}

#[tokio::test]
async fn test_delete_items_forwards_query() {
    let (items, transport) = setup();
    transport.respond_empty(Method::Delete, "/items/posts");

    let query = Query::new().filter(json!({ "status": { "_eq": "archived" } }));
    items
        .delete_items("posts", query.clone(), ClientOptions::default())
        .await
        .unwrap();

    assert_eq!(
        transport.last_request().unwrap().request.body,
        Some(json!({ "query": serde_json::to_value(&query).unwrap() }))
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Failures and token selection
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_reads_and_writes_surface_failures() {
    let (items, transport) = setup();
    transport
        .fail(Method::Get, "/items/posts/1", forbidden())
        .fail(Method::Get, "/items/posts", forbidden())
        .fail(Method::Post, "/items/posts", forbidden())
        .fail(Method::Patch, "/items/posts/1", forbidden())
        .fail(Method::Delete, "/items/posts/1", forbidden());

    let read_one: Result<Value, _> = items.read_item("posts", 1_i64, ItemsOptions::default()).await;
    let read_many: Result<Vec<Value>, _> = items.read_items("posts", ItemsOptions::default()).await;
    let create: Result<Value, _> = items
        .create_item("posts", &json!({}), ItemsOptions::default())
        .await;
    let update: Result<Value, _> = items
        .update_item("posts", 1_i64, &json!({}), ItemsOptions::default())
        .await;
    let delete = items.delete_item("posts", 1_i64, ClientOptions::default()).await;

    assert_eq!(read_one, Err(forbidden()));
    assert_eq!(read_many, Err(forbidden()));
    assert_eq!(create, Err(forbidden()));
    assert_eq!(update, Err(forbidden()));
    assert_eq!(delete, Err(forbidden()));
}

#[tokio::test]
async fn test_collection_level_operations_surface_failures() {
    let (items, transport) = setup();
    transport
        .fail(Method::Get, "/items/settings", forbidden())
        .fail(Method::Patch, "/items/settings", forbidden())
        .fail(Method::Post, "/items/posts", forbidden())
        .fail(Method::Patch, "/items/posts", forbidden())
        .fail(Method::Delete, "/items/posts", forbidden());

    let singleton: Result<Value, _> = items
        .read_singleton("settings", ItemsOptions::default())
        .await;
    let update_singleton: Result<Value, _> = items
        .update_singleton("settings", &json!({ "site_name": "x" }), ItemsOptions::default())
        .await;
    let create_many: Result<Vec<Value>, _> = items
        .create_items("posts", &[json!({ "title": "a" })], ItemsOptions::default())
        .await;
    let update_many: Result<Vec<Value>, _> = items
        .update_items("posts", &[ItemId::Int(1)], &json!({}), ItemsOptions::default())
        .await;
    let delete_by_keys = items
        .delete_items("posts", DeleteSelector::keys([1_i64]), ClientOptions::default())
        .await;
    let delete_by_query = items
        .delete_items("posts", Query::new().limit(1), ClientOptions::default())
        .await;

    assert_eq!(singleton, Err(forbidden()));
    assert_eq!(update_singleton, Err(forbidden()));
    assert_eq!(create_many, Err(forbidden()));
    assert_eq!(update_many, Err(forbidden()));
    assert_eq!(delete_by_keys, Err(forbidden()));
    assert_eq!(delete_by_query, Err(forbidden()));
    assert_eq!(transport.request_count(), 6);
}

#[tokio::test]
async fn test_failures_are_logged_with_operation_message() {
    let (items, transport) = setup();
    transport
        .fail(Method::Get, "/items/settings", forbidden())
        .fail(Method::Delete, "/items/posts/1", forbidden());
    let logs = LogCapture::start();

    let _: Result<Value, _> = items
        .read_singleton("settings", ItemsOptions::default())
        .await;
    let _ = items.delete_item("posts", 1_i64, ClientOptions::default()).await;

    let read = logs.lines_containing("Couldn't read singleton");
    assert_eq!(read.len(), 1);
    assert!(read[0].contains("ERROR"));
    assert!(read[0].contains("collection=\"settings\"") || read[0].contains("collection=settings"));
    assert!(read[0].contains("status=403"));

    let delete = logs.lines_containing("Couldn't delete item");
    assert_eq!(delete.len(), 1);
    assert!(delete[0].contains("posts"));
}

#[tokio::test]
async fn test_empty_key_is_rejected_without_request() {
    let (items, transport) = setup();

    let result: Result<Value, _> = items
        .update_item("posts", "", &json!({ "title": "x" }), ItemsOptions::default())
        .await;

    assert_eq!(
        result,
        Err(DirectusError::EmptyArgument {
            operation: "updateItem",
            argument: "key",
        })
    );
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_core_collections_are_rejected_without_request() {
    let (items, transport) = setup();

    let result: Result<Vec<Value>, _> = items
        .read_items("directus_users", ItemsOptions::default())
        .await;

    assert_eq!(
        result,
        Err(DirectusError::CoreCollection {
            operation: "readItems",
            collection: "directus_users".to_string(),
        })
    );
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_unexpected_response_shape() {
    let (items, transport) = setup();
    transport.respond(Method::Get, "/items/posts", json!({ "not": "a list" }));

    let result: Result<Vec<Post>, _> = items.read_items("posts", ItemsOptions::default()).await;

    assert!(matches!(result, Err(DirectusError::ResponseParseFailed(_))));
}

#[tokio::test]
async fn test_per_call_token_beats_adapter_default() {
    let (items, transport) = setup();
    let items = items.with_default_token(TokenSelection::Static);
    transport.respond(Method::Get, "/items/posts", json!([]));

    let _: Vec<Value> = items.read_items("posts", ItemsOptions::default()).await.unwrap();
    assert_eq!(
        transport.last_request().unwrap().bearer.as_deref(),
        Some("static-token")
    );

    let _: Vec<Value> = items
        .read_items("posts", ItemsOptions::default().token("call-token"))
        .await
        .unwrap();
    assert_eq!(
        transport.last_request().unwrap().bearer.as_deref(),
        Some("call-token")
    );
}
