//! reqwest-backed transport.

use directus_composable_core::{
    ApiErrorEntry, DirectusConfig, DirectusError, Method, RestRequest, Result, Transport,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

/// HTTP transport for a Directus instance.
///
/// Keeps a cookie jar so that `cookie` mode refresh tokens set by the backend
/// are sent back on `/auth/refresh` and `/auth/logout`.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    config: DirectusConfig,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("url", &self.config.url)
            .finish_non_exhaustive()
    }
}

/// Error envelope returned by the backend.
#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<ApiErrorEntry>,
}

impl HttpTransport {
    /// Create a transport from configuration.
    ///
    /// # Errors
    ///
    /// Returns `DirectusError::InvalidConfig` if a default header is not a
    /// valid HTTP header or the HTTP client cannot be built.
    pub fn new(config: &DirectusConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| DirectusError::InvalidConfig(format!("header '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| DirectusError::InvalidConfig(format!("header '{name}': {e}")))?;
            headers.insert(name, value);
        }

        let mut builder = Client::builder().cookie_store(true).default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DirectusError::InvalidConfig(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    const fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl Transport for HttpTransport {
    async fn execute(&self, request: RestRequest, bearer: Option<String>) -> Result<Option<Value>> {
        let url = self.config.endpoint(&request.path);

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            authenticated = bearer.is_some(),
            "Sending Directus request"
        );

        let mut builder = self.client.request(Self::method(request.method), &url);
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if let Some(token) = &bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| DirectusError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DirectusError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(api_error(status, &bytes));
        }

        if status == StatusCode::NO_CONTENT || bytes.is_empty() {
            return Ok(None);
        }

        let body: Value = serde_json::from_slice(&bytes)
            .map_err(|e| DirectusError::ResponseParseFailed(e.to_string()))?;

        Ok(match body {
            Value::Object(mut map) if map.contains_key("data") => map.remove("data"),
            other => Some(other),
        })
    }
}

fn api_error(status: StatusCode, bytes: &[u8]) -> DirectusError {
    let envelope: ErrorEnvelope = serde_json::from_slice(bytes).unwrap_or_default();

    let message = envelope.errors.first().map_or_else(
        || {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        },
        |entry| entry.message.clone(),
    );

    DirectusError::Api {
        status: status.as_u16(),
        message,
        errors: envelope.errors,
    }
}
