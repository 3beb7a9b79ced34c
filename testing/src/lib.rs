//! # Directus Composables Testing
//!
//! Testing utilities for the Directus adapters.
//!
//! This crate provides:
//! - `MockTransport`: scripted responses, records every request
//! - `FixedClock`: deterministic time for token expiry
//! - `init_test_tracing`: log output for failing tests
//! - `LogCapture`: collects log lines emitted on the current thread
//!
//! ## Example
//!
//! ```
//! use directus_composable_core::{commands, Method, Transport};
//! use directus_composable_testing::MockTransport;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let transport = MockTransport::new();
//! transport.respond(Method::Get, "/items/posts", json!([{ "id": 1 }]));
//!
//! let data = transport
//!     .execute(commands::read_items("posts", None).unwrap(), None)
//!     .await
//!     .unwrap();
//! assert_eq!(data, Some(json!([{ "id": 1 }])));
//! assert_eq!(transport.request_count(), 1);
//! # });
//! ```

use chrono::{DateTime, Utc};
use directus_composable_core::environment::Clock;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use directus_composable_core::{DirectusError, Method, RestRequest, Result, Transport};
    use serde_json::Value;
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Arc, Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use directus_composable_testing::mocks::FixedClock;
    /// use directus_composable_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// A request seen by [`MockTransport`].
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedRequest {
        /// The request as built by the adapter.
        pub request: RestRequest,
        /// Bearer token it was sent with.
        pub bearer: Option<String>,
    }

    type Route = (Method, String);

    /// Mock transport.
    ///
    /// Responses are queued per `(method, path)`. The last queued response of a
    /// route is replayed for every further call. Unscripted routes answer with
    /// a 404 `DirectusError::Api`. Clones share scripts and recordings.
    #[derive(Debug, Clone, Default)]
    pub struct MockTransport {
        responses: Arc<Mutex<HashMap<Route, VecDeque<Result<Option<Value>>>>>>,
        requests: Arc<Mutex<Vec<RecordedRequest>>>,
    }

    impl MockTransport {
        /// Create a mock with no scripted responses.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        fn push(&self, method: Method, path: &str, response: Result<Option<Value>>) -> &Self {
            self.responses
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entry((method, path.to_string()))
                .or_default()
                .push_back(response);
            self
        }

        /// Queue a successful response whose `data` is `data`.
        pub fn respond(&self, method: Method, path: &str, data: Value) -> &Self {
            self.push(method, path, Ok(Some(data)))
        }

        /// Queue an empty (`204 No Content`) response.
        pub fn respond_empty(&self, method: Method, path: &str) -> &Self {
            self.push(method, path, Ok(None))
        }

        /// Queue a failure.
        pub fn fail(&self, method: Method, path: &str, error: DirectusError) -> &Self {
            self.push(method, path, Err(error))
        }

        /// All requests seen so far, in order.
        #[must_use]
        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Number of requests seen so far.
        #[must_use]
        pub fn request_count(&self) -> usize {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        /// Most recent request.
        #[must_use]
        pub fn last_request(&self) -> Option<RecordedRequest> {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .last()
                .cloned()
        }

        fn answer(&self, method: Method, path: &str) -> Result<Option<Value>> {
            let mut responses = self
                .responses
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            let Some(queue) = responses.get_mut(&(method, path.to_string())) else {
                return Err(DirectusError::Api {
                    status: 404,
                    message: format!("No mock response for {method} {path}"),
                    errors: vec![],
                });
            };

            if queue.len() > 1 {
                queue.pop_front().unwrap_or(Ok(None))
            } else {
                queue.front().cloned().unwrap_or(Ok(None))
            }
        }
    }

    impl Transport for MockTransport {
        async fn execute(&self, request: RestRequest, bearer: Option<String>) -> Result<Option<Value>> {
            let answer = self.answer(request.method, &request.path);
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(RecordedRequest { request, bearer });
            answer
        }
    }
}

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Honors `RUST_LOG`; safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Collects formatted log output emitted on the current thread.
///
/// The capturing subscriber is installed as the thread default until the
/// capture is dropped, so use it from `#[tokio::test]` (current-thread)
/// tests.
///
/// # Example
///
/// ```
/// use directus_composable_testing::LogCapture;
///
/// let logs = LogCapture::start();
/// tracing::error!(status = 401, "Couldn't login user");
/// assert!(logs.contains("Couldn't login user"));
/// ```
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
    _guard: tracing::subscriber::DefaultGuard,
}

impl LogCapture {
    /// Start capturing at `DEBUG` and above.
    #[must_use]
    pub fn start() -> Self {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let writer = CaptureWriter(Arc::clone(&buffer));

        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        Self {
            buffer,
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }

    /// Everything captured so far.
    #[must_use]
    pub fn output(&self) -> String {
        let bytes = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Whether any captured line contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.output().contains(needle)
    }

    /// Captured lines containing `needle`.
    #[must_use]
    pub fn lines_containing(&self, needle: &str) -> Vec<String> {
        self.output()
            .lines()
            .filter(|line| line.contains(needle))
            .map(str::to_string)
            .collect()
    }
}

#[derive(Clone)]
struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, MockTransport, RecordedRequest, test_clock};
