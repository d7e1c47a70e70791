use axum::{
    http::StatusCode,
    middleware::from_fn,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::WearHistory,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{providers::WeatherProvider, GarmentCatalog, RecommendationEngine},
};

pub mod catalog;
pub mod history;
pub mod recommendations;

/// Shared application state
///
/// The catalog can be replaced at runtime; the wear history is shared by
/// every engine built from this state.
pub struct AppState {
    pub catalog: RwLock<Arc<GarmentCatalog>>,
    pub history: Arc<WearHistory>,
    pub weather: Arc<dyn WeatherProvider>,
}

impl AppState {
    pub fn new(
        catalog: GarmentCatalog,
        history: WearHistory,
        weather: Arc<dyn WeatherProvider>,
    ) -> Self {
        Self {
            catalog: RwLock::new(Arc::new(catalog)),
            history: Arc::new(history),
            weather,
        }
    }

    /// Engine over the current catalog snapshot
    pub async fn engine(&self) -> RecommendationEngine {
        let catalog = self.catalog.read().await.clone();
        RecommendationEngine::new(catalog, Arc::clone(&self.history))
    }

    pub async fn replace_catalog(&self, catalog: GarmentCatalog) {
        *self.catalog.write().await = Arc::new(catalog);
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/requirements", get(recommendations::requirements))
        .route("/recommendations", post(recommendations::recommend))
        .route("/garments", get(catalog::list_garments))
        .route("/catalog", put(catalog::replace_catalog))
        .route("/history", get(history::get_history))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
