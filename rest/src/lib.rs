//! # Directus REST client
//!
//! HTTP transport and client factory used by the Directus adapters.
//!
//! ## Example
//!
//! ```no_run
//! use directus_composable_core::{commands, DirectusConfig, Query, TokenSelection};
//! use directus_composable_rest::DirectusEnvironment;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads DIRECTUS_URL / DIRECTUS_STATIC_TOKEN
//!     let env = DirectusEnvironment::from_config(DirectusConfig::from_env()?)?;
//!
//!     let client = env.client(TokenSelection::Static)?;
//!     let posts: serde_json::Value = client
//!         .request_as(commands::read_items("posts", Some(&Query::new().limit(5)))?)
//!         .await?;
//!
//!     println!("{posts}");
//!     Ok(())
//! }
//! ```

pub mod factory;
pub mod http;

pub use factory::{DirectusEnvironment, DirectusRest};
pub use http::HttpTransport;
