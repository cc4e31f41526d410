//! Typed client for the Climbate catalog service.
//!
//! [`CatalogApi`] is the seam the rest of the workspace depends on;
//! [`CatalogClient`] is the reqwest-backed implementation used in production.

mod api;
mod client;
mod error;

pub use api::CatalogApi;
pub use client::CatalogClient;
pub use client::ClientOptions;
pub use client::DEFAULT_TIMEOUT;
pub use error::CatalogError;
pub use error::Result;
