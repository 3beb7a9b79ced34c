//! Query descriptor passed through to the backend.
//!
//! The adapters never look inside a [`Query`]; it is only encoded, either as
//! URL query parameters or as a JSON object (bulk delete by filter).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Filter, sort and field selection for item reads and writes.
///
/// # Examples
///
/// ```
/// use directus_composable_core::Query;
/// use serde_json::json;
///
/// let query = Query::new()
///     .fields(["id", "title"])
///     .filter(json!({ "status": { "_eq": "published" } }))
///     .sort(["-date_created"])
///     .limit(10);
///
/// let params = query.to_params();
/// assert!(params.contains(&("fields".to_string(), "id,title".to_string())));
/// assert!(params.contains(&("limit".to_string(), "10".to_string())));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Fields to return.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    /// Filter rules (backend filter syntax).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    /// Full text search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Sort fields, `-` prefix for descending.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<String>,
    /// Maximum number of items; `-1` means unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    /// Number of items to skip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    /// Page number (1-based), alternative to `offset`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    /// Nested query parameters for relational fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep: Option<Value>,
    /// Field aliases.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub alias: BTreeMap<String, String>,
    /// Metadata to include (`total_count`, `filter_count`, `*`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    /// Aggregate functions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<Value>,
    /// Grouping fields for aggregates.
    #[serde(default, rename = "groupBy", skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<String>,
}

impl Query {
    /// Create an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set fields.
    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set filter.
    #[must_use]
    pub fn filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Builder: set search term.
    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Builder: set sort fields.
    #[must_use]
    pub fn sort<I, S>(mut self, sort: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort = sort.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set limit.
    #[must_use]
    pub const fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Builder: set offset.
    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Builder: set page.
    #[must_use]
    pub const fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    /// Builder: set deep query.
    #[must_use]
    pub fn deep(mut self, deep: Value) -> Self {
        self.deep = Some(deep);
        self
    }

    /// Builder: add an alias.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>, field: impl Into<String>) -> Self {
        self.alias.insert(alias.into(), field.into());
        self
    }

    /// Builder: set meta.
    #[must_use]
    pub fn meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    /// Builder: set aggregate.
    #[must_use]
    pub fn aggregate(mut self, aggregate: Value) -> Self {
        self.aggregate = Some(aggregate);
        self
    }

    /// Builder: set group-by fields.
    #[must_use]
    pub fn group_by<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Encode as URL query parameters.
    ///
    /// Lists are comma-joined, JSON members are compact JSON strings and unset
    /// members are omitted. Parameter order is stable.
    #[must_use]
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if !self.fields.is_empty() {
            params.push(("fields".to_string(), self.fields.join(",")));
        }
        if let Some(filter) = &self.filter {
            params.push(("filter".to_string(), filter.to_string()));
        }
        if let Some(search) = &self.search {
            params.push(("search".to_string(), search.clone()));
        }
        if !self.sort.is_empty() {
            params.push(("sort".to_string(), self.sort.join(",")));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page".to_string(), page.to_string()));
        }
        if let Some(deep) = &self.deep {
            params.push(("deep".to_string(), deep.to_string()));
        }
        if !self.alias.is_empty() {
            let alias = serde_json::to_string(&self.alias).unwrap_or_default();
            params.push(("alias".to_string(), alias));
        }
        if let Some(meta) = &self.meta {
            params.push(("meta".to_string(), meta.clone()));
        }
        if let Some(aggregate) = &self.aggregate {
            params.push(("aggregate".to_string(), aggregate.to_string()));
        }
        if !self.group_by.is_empty() {
            params.push(("groupBy".to_string(), self.group_by.join(",")));
        }

        params
    }
}

/// Encode an optional query; `None` yields no parameters.
#[must_use]
pub fn params_of(query: Option<&Query>) -> Vec<(String, String)> {
    query.map(Query::to_params).unwrap_or_default()
}
