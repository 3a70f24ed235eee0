//! HTTP router and handlers
//!
//! The cached product routes all follow the same shape: derive the cache
//! key from the verbatim request path+query, then serve from memory or
//! fall through to the upstream client. The cache is fully transparent to
//! the response contract — a cached payload and a freshly-fetched payload
//! are byte-for-byte the same JSON.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{OriginalUri, Path, Query, State},
    http::{HeaderValue, Method, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer, cors::CorsLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::cache::{ResponseCache, cache_key};
use crate::config::{CacheConfig, CorsConfig};
use crate::upstream::{ProductClient, ProductQuery};
use crate::Result;

/// Shared application state
pub struct AppState {
    /// Response cache, one instance for the life of the process
    pub cache: ResponseCache,
    /// Upstream product API client
    pub upstream: ProductClient,
    /// Per-route TTLs
    pub cache_config: CacheConfig,
}

/// Create the router
pub fn create_router(state: Arc<AppState>, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/products", get(products_handler))
        .route("/api/products/categories", get(categories_handler))
        .route(
            "/api/products/category/{category}",
            get(category_products_handler),
        )
        .route("/api/products/{id}", get(product_handler))
        .route("/api/cache/clear", post(clear_cache_handler))
        .fallback(not_found_handler)
        .layer(CatchPanicLayer::new())
        .layer(CompressionLayer::new())
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the CORS layer from the configured origin allow-list
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// GET /api/products - product listing, cached with the default TTL.
///
/// A non-blank `q` proxies to the upstream search endpoint; the search
/// term is part of the cache key, so searches cache independently.
async fn products_handler(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Value>> {
    let key = cache_key(uri.path(), uri.query());
    let payload = state
        .cache
        .get_or_fetch(&key, state.cache_config.default_ttl, || {
            state.upstream.fetch_products(&query)
        })
        .await?;
    Ok(Json(payload))
}

/// GET /api/products/categories - category list.
///
/// Categories change slowly, so this route uses the longer TTL.
async fn categories_handler(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Value>> {
    let key = cache_key(uri.path(), uri.query());
    let payload = state
        .cache
        .get_or_fetch(&key, state.cache_config.categories_ttl, || {
            state.upstream.fetch_categories()
        })
        .await?;
    Ok(Json(payload))
}

/// GET /api/products/category/{category} - one category's products
async fn category_products_handler(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    Path(category): Path<String>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Value>> {
    let key = cache_key(uri.path(), uri.query());
    let payload = state
        .cache
        .get_or_fetch(&key, state.cache_config.default_ttl, || {
            state.upstream.fetch_by_category(&category, &query)
        })
        .await?;
    Ok(Json(payload))
}

/// GET /api/products/{id} - single product record
async fn product_handler(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let key = cache_key(uri.path(), uri.query());
    let payload = state
        .cache
        .get_or_fetch(&key, state.cache_config.default_ttl, || {
            state.upstream.fetch_product(&id)
        })
        .await?;
    Ok(Json(payload))
}

/// GET /health - liveness and cache introspection
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    let stats = state.cache.stats();
    Json(json!({
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "cache": {
            "size": stats.size,
            "entries": stats.keys,
            "hits": stats.hits,
            "misses": stats.misses,
            "hit_rate": stats.hit_rate,
        },
    }))
}

/// POST /api/cache/clear - discard all cached entries
async fn clear_cache_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    let discarded = state.cache.stats().size;
    state.cache.clear();
    info!(discarded = discarded, "Cache cleared");
    Json(json!({"message": "Cache cleared successfully"}))
}

/// JSON 404 for unmatched routes
async fn not_found_handler(method: Method, OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not found",
            "message": format!("Route {} {} not found", method, uri.path()),
        })),
    )
}
