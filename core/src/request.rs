//! Transport-neutral description of one REST call.

use crate::query::Query;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// HTTP method of a [`RestRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Upper-case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request produced by one of the [`crate::commands`] builders.
#[derive(Debug, Clone, PartialEq)]
pub struct RestRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the instance URL, starting with `/`.
    pub path: String,
    /// URL query parameters.
    pub params: Vec<(String, String)>,
    /// JSON body.
    pub body: Option<Value>,
}

impl RestRequest {
    /// Create a request without parameters or body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            body: None,
        }
    }

    /// Builder: set query parameters.
    #[must_use]
    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }

    /// Builder: set JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Primary key of an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    /// Integer key.
    Int(i64),
    /// String key (UUIDs, slugs).
    Str(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<i32> for ItemId {
    fn from(id: i32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<u32> for ItemId {
    fn from(id: u32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::Str(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self::Str(id)
    }
}

/// Which items a bulk delete removes.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteSelector {
    /// Delete exactly these keys.
    Keys(Vec<ItemId>),
    /// Delete everything matching the query.
    Query(Query),
}

impl DeleteSelector {
    /// Build a key selector from anything convertible to [`ItemId`].
    #[must_use]
    pub fn keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<ItemId>,
    {
        Self::Keys(keys.into_iter().map(Into::into).collect())
    }
}

impl From<Query> for DeleteSelector {
    fn from(query: Query) -> Self {
        Self::Query(query)
    }
}

impl From<Vec<ItemId>> for DeleteSelector {
    fn from(keys: Vec<ItemId>) -> Self {
        Self::Keys(keys)
    }
}
