//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::CacheService;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::info::ServerInfo;
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, PutRequest, PutResponse, StatsResponse,
};
use crate::tasks::spawn_info_refresh_task;

/// Application state shared across all handlers.
///
/// The cache service is shared behind an `Arc`; it does its own per-bucket
/// locking, so handlers never take a global lock.
#[derive(Clone)]
pub struct AppState {
    /// The sharded cache
    pub cache: Arc<CacheService>,
    /// Process description for the info endpoint, refreshed in the background
    pub info: Arc<RwLock<ServerInfo>>,
}

impl AppState {
    /// Creates a new AppState around an existing cache service.
    pub fn new(cache: CacheService) -> Self {
        let info = ServerInfo::collect(cache.bucket_count());
        Self {
            cache: Arc::new(cache),
            info: Arc::new(RwLock::new(info)),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Starts the per-bucket sweep tasks and the info refresh task, so it must
    /// run inside a tokio runtime.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let cache = CacheService::initialize(
            config.bucket_count,
            Duration::from_secs(config.sweep_interval),
        )?;
        let state = Self::new(cache);
        spawn_info_refresh_task(
            state.info.clone(),
            Duration::from_secs(config.info_refresh_interval),
        );
        Ok(state)
    }
}

/// Handler for PUT /v1/cache/*key
///
/// Stores a value under the key with an optional TTL.
pub async fn put_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<PutRequest>,
) -> Result<Json<PutResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl();
    state.cache.put(key.clone(), req.value, ttl).await;

    Ok(Json(PutResponse::new(key)))
}

/// Handler for GET /v1/cache/*key
///
/// Retrieves an entry by key. Absent and expired keys are both 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let entry = state.cache.get(&key).await?;

    Ok(Json(GetResponse::new(key, entry)))
}

/// Handler for DELETE /v1/cache/*key
///
/// Deletes a key. Succeeds whether or not the key existed.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    if !state.cache.delete(&key).await {
        debug!("Delete of absent key '{}'", key);
    }

    Json(DeleteResponse::new(key))
}

/// Handler for GET /v1/cache
///
/// Returns statistics summed over every bucket.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats()))
}

/// Handler for GET /v1/info
pub async fn info_handler(State(state): State<AppState>) -> Json<ServerInfo> {
    Json(state.info.read().await.clone())
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
