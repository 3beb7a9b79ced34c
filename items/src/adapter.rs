//! Items adapter.

use crate::options::ItemsOptions;
use directus_composable_core::{
    commands, ClientOptions, DeleteSelector, ItemId, RefreshTokenCookie, RestRequest, Result,
    SessionStore, TokenSelection, Transport,
};
use directus_composable_rest::DirectusEnvironment;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::Instrument;

/// CRUD over regular and singleton collections.
///
/// Each operation builds one request, sends it with the selected token and
/// returns the response `data`. Failures are logged once with a fixed
/// message and returned. System (`directus_*`) collections, empty collection
/// names and empty keys are rejected before any request is sent.
///
/// # Example
///
/// ```no_run
/// use directus_composable_core::{DirectusConfig, Query, TokenSelection};
/// use directus_composable_items::{DirectusItems, ItemsOptions};
/// use directus_composable_rest::DirectusEnvironment;
/// use serde_json::Value;
/// use std::sync::Arc;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let env = Arc::new(DirectusEnvironment::from_config(DirectusConfig::from_env()?)?);
/// let items = DirectusItems::new(env).with_default_token(TokenSelection::Static);
///
/// let posts: Vec<Value> = items
///     .read_items("posts", ItemsOptions::with_query(Query::new().limit(10)))
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct DirectusItems<T, S, C> {
    env: Arc<DirectusEnvironment<T, S, C>>,
    default_token: TokenSelection,
}

impl<T, S, C> Clone for DirectusItems<T, S, C> {
    fn clone(&self) -> Self {
        Self {
            env: Arc::clone(&self.env),
            default_token: self.default_token.clone(),
        }
    }
}

impl<T, S, C> DirectusItems<T, S, C>
where
    T: Transport,
    S: SessionStore,
    C: RefreshTokenCookie,
{
    /// Create the adapter. Calls authenticate with the session token unless
    /// overridden.
    #[must_use]
    pub const fn new(env: Arc<DirectusEnvironment<T, S, C>>) -> Self {
        Self {
            env,
            default_token: TokenSelection::Session,
        }
    }

    /// Token selection used when a call does not override it.
    #[must_use]
    pub fn with_default_token(mut self, token: impl Into<TokenSelection>) -> Self {
        self.default_token = token.into();
        self
    }

    /// Create one item.
    ///
    /// # Errors
    ///
    /// Returns `DirectusError::CoreCollection` for system collections,
    /// `DirectusError::EmptyArgument` for an empty name or key,
    /// `DirectusError::SerializationFailed` if `item` cannot be encoded,
    /// otherwise the backend or transport error.
    pub async fn create_item<I, R>(&self, collection: &str, item: &I, options: ItemsOptions) -> Result<R>
    where
        I: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let run = async {
            let request = commands::create_item(collection, to_value(item)?, options.query.as_ref())?;
            self.fetch(&options.client_options(), request).await
        };
        logged(collection, "Couldn't create item", run).await
    }

    /// Create several items in one request.
    ///
    /// # Errors
    ///
    /// As [`Self::create_item`].
    pub async fn create_items<I, R>(
        &self,
        collection: &str,
        items: &[I],
        options: ItemsOptions,
    ) -> Result<Vec<R>>
    where
        I: Serialize,
        R: DeserializeOwned,
    {
        let run = async {
            let payload = items.iter().map(to_value).collect::<Result<Vec<_>>>()?;
            let request = commands::create_items(collection, payload, options.query.as_ref())?;
            self.fetch(&options.client_options(), request).await
        };
        logged(collection, "Couldn't create items", run).await
    }

    /// Read one item by primary key.
    ///
    /// # Errors
    ///
    /// Returns `DirectusError::CoreCollection` for system collections,
    /// `DirectusError::EmptyArgument` for an empty name or key,
    /// otherwise the backend or transport error (`403` for a missing item).
    pub async fn read_item<R>(
        &self,
        collection: &str,
        id: impl Into<ItemId>,
        options: ItemsOptions,
    ) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let id = id.into();
        let run = async {
            let request = commands::read_item(collection, &id, options.query.as_ref())?;
            self.fetch(&options.client_options(), request).await
        };
        logged(collection, "Couldn't read item", run).await
    }

    /// Read the items of a collection matching the query.
    ///
    /// # Errors
    ///
    /// Returns `DirectusError::CoreCollection` for system collections,
    /// `DirectusError::EmptyArgument` for an empty name or key,
    /// otherwise the backend or transport error.
    pub async fn read_items<R>(&self, collection: &str, options: ItemsOptions) -> Result<Vec<R>>
    where
        R: DeserializeOwned,
    {
        let run = async {
            let request = commands::read_items(collection, options.query.as_ref())?;
            self.fetch(&options.client_options(), request).await
        };
        logged(collection, "Couldn't read items", run).await
    }

    /// Read a singleton collection.
    ///
    /// # Errors
    ///
    /// Returns `DirectusError::CoreCollection` for system collections,
    /// `DirectusError::EmptyArgument` for an empty name or key,
    /// otherwise the backend or transport error.
    pub async fn read_singleton<R>(&self, collection: &str, options: ItemsOptions) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let run = async {
            let request = commands::read_singleton(collection, options.query.as_ref())?;
            self.fetch(&options.client_options(), request).await
        };
        logged(collection, "Couldn't read singleton", run).await
    }

    /// Apply a partial update to one item.
    ///
    /// # Errors
    ///
    /// As [`Self::create_item`].
    pub async fn update_item<I, R>(
        &self,
        collection: &str,
        id: impl Into<ItemId>,
        item: &I,
        options: ItemsOptions,
    ) -> Result<R>
    where
        I: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let id = id.into();
        let run = async {
            let request =
                commands::update_item(collection, &id, to_value(item)?, options.query.as_ref())?;
            self.fetch(&options.client_options(), request).await
        };
        logged(collection, "Couldn't update item", run).await
    }

    /// Apply the same partial update to every key in `keys`.
    ///
    /// # Errors
    ///
    /// As [`Self::create_item`].
    pub async fn update_items<I, R>(
        &self,
        collection: &str,
        keys: &[ItemId],
        item: &I,
        options: ItemsOptions,
    ) -> Result<Vec<R>>
    where
        I: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let run = async {
            let request =
                commands::update_items(collection, keys, to_value(item)?, options.query.as_ref())?;
            self.fetch(&options.client_options(), request).await
        };
        logged(collection, "Couldn't update items", run).await
    }

    /// Apply a partial update to a singleton collection.
    ///
    /// # Errors
    ///
    /// As [`Self::create_item`].
    pub async fn update_singleton<I, R>(
        &self,
        collection: &str,
        item: &I,
        options: ItemsOptions,
    ) -> Result<R>
    where
        I: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let run = async {
            let request =
                commands::update_singleton(collection, to_value(item)?, options.query.as_ref())?;
            self.fetch(&options.client_options(), request).await
        };
        logged(collection, "Couldn't update singleton", run).await
    }

    /// Delete one item.
    ///
    /// # Errors
    ///
    /// Returns `DirectusError::CoreCollection` for system collections,
    /// `DirectusError::EmptyArgument` for an empty name or key,
    /// otherwise the backend or transport error.
    pub async fn delete_item(
        &self,
        collection: &str,
        id: impl Into<ItemId>,
        options: ClientOptions,
    ) -> Result<()> {
        let id = id.into();
        let run = async {
            let request = commands::delete_item(collection, &id)?;
            self.send(&options, request).await
        };
        logged(collection, "Couldn't delete item", run).await
    }

    /// Delete items by key list or by query.
    ///
    /// # Errors
    ///
    /// Returns `DirectusError::CoreCollection` for system collections,
    /// `DirectusError::EmptyArgument` for an empty name or key,
    /// otherwise the backend or transport error.
    pub async fn delete_items(
        &self,
        collection: &str,
        selector: impl Into<DeleteSelector>,
        options: ClientOptions,
    ) -> Result<()> {
        let selector = selector.into();
        let run = async {
            let request = commands::delete_items(collection, &selector)?;
            self.send(&options, request).await
        };
        logged(collection, "Couldn't delete items", run).await
    }

    async fn fetch<R: DeserializeOwned>(
        &self,
        options: &ClientOptions,
        request: RestRequest,
    ) -> Result<R> {
        self.env
            .client(options.selection_or(&self.default_token))?
            .request_as(request)
            .await
    }

    async fn send(&self, options: &ClientOptions, request: RestRequest) -> Result<()> {
        self.env
            .client(options.selection_or(&self.default_token))?
            .request(request)
            .await
            .map(|_| ())
    }
}

/// Run one operation inside a span carrying `collection`, logging its failure.
async fn logged<R>(
    collection: &str,
    context: &'static str,
    run: impl Future<Output = Result<R>>,
) -> Result<R> {
    async { run.await.inspect_err(|e| e.log_failure(context)) }
        .instrument(tracing::error_span!("directus_items", collection))
        .await
}

fn to_value<I: Serialize + ?Sized>(item: &I) -> Result<Value> {
    Ok(serde_json::to_value(item)?)
}
