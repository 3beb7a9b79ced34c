//! Which credential a request authenticates with.

/// Token used to authenticate a request.
///
/// Converts from the loose forms accepted by the composables:
/// `false` → [`TokenSelection::Session`], `true` → [`TokenSelection::Static`],
/// a string → [`TokenSelection::Explicit`].
///
/// # Examples
///
/// ```
/// use directus_composable_core::TokenSelection;
///
/// assert_eq!(TokenSelection::from(false), TokenSelection::Session);
/// assert_eq!(TokenSelection::from(true), TokenSelection::Static);
/// assert_eq!(
///     TokenSelection::from("abc"),
///     TokenSelection::Explicit("abc".to_string())
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum TokenSelection {
    /// The session's access token; anonymous when signed out.
    #[default]
    Session,
    /// The configured static token.
    Static,
    /// A literal token.
    Explicit(String),
}

impl TokenSelection {
    /// `self` unless it is [`TokenSelection::Session`], in which case `fallback`.
    ///
    /// Per-call selections use this to defer to an adapter-wide default.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        match self {
            Self::Session => fallback,
            other => other,
        }
    }
}

impl From<bool> for TokenSelection {
    fn from(use_static: bool) -> Self {
        if use_static { Self::Static } else { Self::Session }
    }
}

impl From<&str> for TokenSelection {
    fn from(token: &str) -> Self {
        Self::Explicit(token.to_string())
    }
}

impl From<String> for TokenSelection {
    fn from(token: String) -> Self {
        Self::Explicit(token)
    }
}

/// Per-call client options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    /// Token override for this call.
    pub token: Option<TokenSelection>,
}

impl ClientOptions {
    /// Options selecting `token` for this call.
    #[must_use]
    pub fn with_token(token: impl Into<TokenSelection>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// Effective selection given an adapter-wide default.
    #[must_use]
    pub fn selection_or(&self, fallback: &TokenSelection) -> TokenSelection {
        self.token
            .clone()
            .map_or_else(|| fallback.clone(), |token| token.or(fallback.clone()))
    }
}
