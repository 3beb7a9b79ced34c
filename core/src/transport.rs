//! Transport seam between the adapters and the network.

use crate::error::Result;
use crate::request::RestRequest;
use serde_json::Value;
use std::future::Future;

/// Executes [`RestRequest`]s against a Directus instance.
///
/// # Implementation Notes
///
/// - Success bodies are unwrapped: the `data` member is returned
/// - Empty bodies (`204 No Content`) yield `None`
/// - Non-success statuses map to `DirectusError::Api` carrying the error envelope
/// - No retries; timeouts are whatever the implementation's client applies
pub trait Transport: Send + Sync {
    /// Execute one request.
    ///
    /// # Arguments
    ///
    /// - `request`: Request to perform
    /// - `bearer`: Token for the `Authorization` header, `None` for anonymous
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network request fails → `DirectusError::RequestFailed`
    /// - Backend rejects the request → `DirectusError::Api`
    /// - Body is not valid JSON → `DirectusError::ResponseParseFailed`
    fn execute(
        &self,
        request: RestRequest,
        bearer: Option<String>,
    ) -> impl Future<Output = Result<Option<Value>>> + Send;
}
