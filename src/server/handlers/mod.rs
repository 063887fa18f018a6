//! HTTP request handlers for the analysis server.

mod analyze;
mod api;

// Re-export handlers for use by the router
pub use analyze::{analyze_document, preflight};
pub use api::health;
