//! Request builders for the Directus REST API.
//!
//! Each builder maps one API operation onto a [`RestRequest`]. Builders do no
//! I/O; executing the request is the job of a [`crate::Transport`].

use crate::error::{DirectusError, Result};
use crate::query::{params_of, Query};
use crate::request::{DeleteSelector, ItemId, Method, RestRequest};
use crate::session::AuthMode;
use serde_json::{json, Map, Value};

/// Prefix of system collections, which have dedicated endpoints.
const CORE_COLLECTION_PREFIX: &str = "directus_";

fn items_path(collection: &str) -> String {
    format!("/items/{}", urlencoding::encode(collection))
}

fn item_path(collection: &str, id: &ItemId) -> String {
    format!(
        "{}/{}",
        items_path(collection),
        urlencoding::encode(&id.to_string())
    )
}

fn ensure_regular(collection: &str, operation: &'static str) -> Result<()> {
    if collection.trim().is_empty() {
        return Err(DirectusError::EmptyArgument {
            operation,
            argument: "collection",
        });
    }
    if collection.starts_with(CORE_COLLECTION_PREFIX) {
        return Err(DirectusError::CoreCollection {
            operation,
            collection: collection.to_string(),
        });
    }
    Ok(())
}

/// An empty key would address the whole collection.
fn ensure_key(id: &ItemId, operation: &'static str) -> Result<()> {
    match id {
        ItemId::Str(key) if key.trim().is_empty() => Err(DirectusError::EmptyArgument {
            operation,
            argument: "key",
        }),
        _ => Ok(()),
    }
}

fn auth_body(mode: AuthMode, refresh_token: Option<&str>) -> Value {
    let mut body = Map::new();
    body.insert("mode".to_string(), json!(mode));
    if let Some(token) = refresh_token {
        body.insert("refresh_token".to_string(), json!(token));
    }
    Value::Object(body)
}

// ═══════════════════════════════════════════════════════════════════════
// Authentication
// ═══════════════════════════════════════════════════════════════════════

/// `POST /auth/login`
#[must_use]
pub fn login(email: &str, password: &str, mode: AuthMode, otp: Option<&str>) -> RestRequest {
    let mut body = json!({ "email": email, "password": password, "mode": mode });
    if let (Some(otp), Value::Object(map)) = (otp, &mut body) {
        map.insert("otp".to_string(), json!(otp));
    }
    RestRequest::new(Method::Post, "/auth/login").with_body(body)
}

/// `POST /auth/refresh`
#[must_use]
pub fn refresh(mode: AuthMode, refresh_token: Option<&str>) -> RestRequest {
    RestRequest::new(Method::Post, "/auth/refresh").with_body(auth_body(mode, refresh_token))
}

/// `POST /auth/logout`
#[must_use]
pub fn logout(mode: AuthMode, refresh_token: Option<&str>) -> RestRequest {
    RestRequest::new(Method::Post, "/auth/logout").with_body(auth_body(mode, refresh_token))
}

/// `POST /auth/password/request`
#[must_use]
pub fn password_request(email: &str, reset_url: Option<&str>) -> RestRequest {
    let mut body = json!({ "email": email });
    if let (Some(url), Value::Object(map)) = (reset_url, &mut body) {
        map.insert("reset_url".to_string(), json!(url));
    }
    RestRequest::new(Method::Post, "/auth/password/request").with_body(body)
}

/// `POST /auth/password/reset`
#[must_use]
pub fn password_reset(token: &str, password: &str) -> RestRequest {
    RestRequest::new(Method::Post, "/auth/password/reset")
        .with_body(json!({ "token": token, "password": password }))
}

/// `POST /users/invite`
#[must_use]
pub fn invite_user(email: &str, role: &str, invite_url: Option<&str>) -> RestRequest {
    let mut body = json!({ "email": email, "role": role });
    if let (Some(url), Value::Object(map)) = (invite_url, &mut body) {
        map.insert("invite_url".to_string(), json!(url));
    }
    RestRequest::new(Method::Post, "/users/invite").with_body(body)
}

/// `POST /users/invite/accept`
#[must_use]
pub fn accept_user_invite(token: &str, password: &str) -> RestRequest {
    RestRequest::new(Method::Post, "/users/invite/accept")
        .with_body(json!({ "token": token, "password": password }))
}

/// `GET /users/me`
#[must_use]
pub fn read_me(query: Option<&Query>) -> RestRequest {
    RestRequest::new(Method::Get, "/users/me").with_params(params_of(query))
}

// ═══════════════════════════════════════════════════════════════════════
// Items
// ═══════════════════════════════════════════════════════════════════════

/// `POST /items/{collection}` with a single item.
///
/// # Errors
///
/// Returns `DirectusError::CoreCollection` for system collections,
/// `DirectusError::EmptyArgument` for an empty name or key.
pub fn create_item(collection: &str, item: Value, query: Option<&Query>) -> Result<RestRequest> {
    ensure_regular(collection, "createItem")?;
    Ok(RestRequest::new(Method::Post, items_path(collection))
        .with_params(params_of(query))
        .with_body(item))
}

/// `POST /items/{collection}` with a batch of items.
///
/// # Errors
///
/// Returns `DirectusError::CoreCollection` for system collections,
/// `DirectusError::EmptyArgument` for an empty name or key.
pub fn create_items(
    collection: &str,
    items: Vec<Value>,
    query: Option<&Query>,
) -> Result<RestRequest> {
    ensure_regular(collection, "createItems")?;
    Ok(RestRequest::new(Method::Post, items_path(collection))
        .with_params(params_of(query))
        .with_body(Value::Array(items)))
}

/// `GET /items/{collection}/{id}`
///
/// # Errors
///
/// Returns `DirectusError::CoreCollection` for system collections,
/// `DirectusError::EmptyArgument` for an empty name or key.
pub fn read_item(collection: &str, id: &ItemId, query: Option<&Query>) -> Result<RestRequest> {
    ensure_regular(collection, "readItem")?;
    ensure_key(id, "readItem")?;
    Ok(RestRequest::new(Method::Get, item_path(collection, id)).with_params(params_of(query)))
}

/// `GET /items/{collection}`
///
/// # Errors
///
/// Returns `DirectusError::CoreCollection` for system collections,
/// `DirectusError::EmptyArgument` for an empty name or key.
pub fn read_items(collection: &str, query: Option<&Query>) -> Result<RestRequest> {
    ensure_regular(collection, "readItems")?;
    Ok(RestRequest::new(Method::Get, items_path(collection)).with_params(params_of(query)))
}

/// `GET /items/{collection}` on a singleton collection.
///
/// # Errors
///
/// Returns `DirectusError::CoreCollection` for system collections,
/// `DirectusError::EmptyArgument` for an empty name or key.
pub fn read_singleton(collection: &str, query: Option<&Query>) -> Result<RestRequest> {
    ensure_regular(collection, "readSingleton")?;
    Ok(RestRequest::new(Method::Get, items_path(collection)).with_params(params_of(query)))
}

/// `PATCH /items/{collection}/{id}`
///
/// # Errors
///
/// Returns `DirectusError::CoreCollection` for system collections,
/// `DirectusError::EmptyArgument` for an empty name or key.
pub fn update_item(
    collection: &str,
    id: &ItemId,
    item: Value,
    query: Option<&Query>,
) -> Result<RestRequest> {
    ensure_regular(collection, "updateItem")?;
    ensure_key(id, "updateItem")?;
    Ok(RestRequest::new(Method::Patch, item_path(collection, id))
        .with_params(params_of(query))
        .with_body(item))
}

/// `PATCH /items/{collection}` applying one partial item to several keys.
///
/// # Errors
///
/// Returns `DirectusError::CoreCollection` for system collections,
/// `DirectusError::EmptyArgument` for an empty name or key.
pub fn update_items(
    collection: &str,
    keys: &[ItemId],
    item: Value,
    query: Option<&Query>,
) -> Result<RestRequest> {
    ensure_regular(collection, "updateItems")?;
    for key in keys {
        ensure_key(key, "updateItems")?;
    }
    Ok(RestRequest::new(Method::Patch, items_path(collection))
        .with_params(params_of(query))
        .with_body(json!({ "keys": keys, "data": item })))
}

/// `PATCH /items/{collection}` on a singleton collection.
///
/// # Errors
///
/// Returns `DirectusError::CoreCollection` for system collections,
/// `DirectusError::EmptyArgument` for an empty name or key.
pub fn update_singleton(collection: &str, item: Value, query: Option<&Query>) -> Result<RestRequest> {
    ensure_regular(collection, "updateSingleton")?;
    Ok(RestRequest::new(Method::Patch, items_path(collection))
        .with_params(params_of(query))
        .with_body(item))
}

/// `DELETE /items/{collection}/{id}`
///
/// # Errors
///
/// Returns `DirectusError::CoreCollection` for system collections,
/// `DirectusError::EmptyArgument` for an empty name or key.
pub fn delete_item(collection: &str, id: &ItemId) -> Result<RestRequest> {
    ensure_regular(collection, "deleteItem")?;
    ensure_key(id, "deleteItem")?;
    Ok(RestRequest::new(Method::Delete, item_path(collection, id)))
}

/// `DELETE /items/{collection}` by key list (`[keys]`) or query (`{query}`).
///
/// # Errors
///
/// Returns `DirectusError::CoreCollection` for system collections,
/// `DirectusError::EmptyArgument` for an empty name or key, or
/// `DirectusError::SerializationFailed` if the query cannot be encoded.
pub fn delete_items(collection: &str, selector: &DeleteSelector) -> Result<RestRequest> {
    ensure_regular(collection, "deleteItems")?;
    if let DeleteSelector::Keys(keys) = selector {
        for key in keys {
            ensure_key(key, "deleteItems")?;
        }
    }
    let body = match selector {
        DeleteSelector::Keys(keys) => serde_json::to_value(keys)?,
        DeleteSelector::Query(query) => json!({ "query": query }),
    };
    Ok(RestRequest::new(Method::Delete, items_path(collection)).with_body(body))
}
