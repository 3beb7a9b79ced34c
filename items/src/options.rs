//! Per-call options for item operations.

use directus_composable_core::{ClientOptions, Query, TokenSelection};

/// Options accepted by the create, read and update operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemsOptions {
    /// Query descriptor forwarded as URL parameters.
    pub query: Option<Query>,

    /// Token override for this call.
    ///
    /// Default: the adapter's default selection
    pub token: Option<TokenSelection>,
}

impl ItemsOptions {
    /// Options carrying `query`.
    #[must_use]
    pub fn with_query(query: Query) -> Self {
        Self {
            query: Some(query),
            token: None,
        }
    }

    /// Set the token selection.
    #[must_use]
    pub fn token(mut self, token: impl Into<TokenSelection>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub(crate) fn client_options(&self) -> ClientOptions {
        ClientOptions {
            token: self.token.clone(),
        }
    }
}

impl From<Query> for ItemsOptions {
    fn from(query: Query) -> Self {
        Self::with_query(query)
    }
}

impl From<ClientOptions> for ItemsOptions {
    fn from(options: ClientOptions) -> Self {
        Self {
            query: None,
            token: options.token,
        }
    }
}
