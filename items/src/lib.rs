//! # Directus Composables: Items
//!
//! Create, read, update and delete items of regular and singleton
//! collections. Each operation is one request against
//! `/items/{collection}`; queries are forwarded as URL parameters without
//! inspection.
//!
//! | Operation          | Request                                  |
//! |--------------------|------------------------------------------|
//! | `create_item(s)`   | `POST /items/{collection}`               |
//! | `read_item`        | `GET /items/{collection}/{id}`           |
//! | `read_items`       | `GET /items/{collection}`                |
//! | `read_singleton`   | `GET /items/{collection}`                |
//! | `update_item`      | `PATCH /items/{collection}/{id}`         |
//! | `update_items`     | `PATCH /items/{collection}` (`keys`)     |
//! | `update_singleton` | `PATCH /items/{collection}`              |
//! | `delete_item`      | `DELETE /items/{collection}/{id}`        |
//! | `delete_items`     | `DELETE /items/{collection}` (keys/query)|

pub mod adapter;
pub mod options;

pub use adapter::DirectusItems;
pub use options::ItemsOptions;
