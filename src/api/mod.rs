//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `GET /v1/info` - Process information
//! - `GET /v1/cache` - Aggregated cache statistics
//! - `GET /v1/cache/*key` - Retrieve an entry
//! - `PUT /v1/cache/*key` - Store a value with optional TTL
//! - `DELETE /v1/cache/*key` - Delete a key
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
