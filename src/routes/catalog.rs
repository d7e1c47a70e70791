use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Garment, Role},
    routes::AppState,
    services::{GarmentCatalog, RejectedRecord},
};

#[derive(Debug, Deserialize)]
pub struct GarmentQuery {
    role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CatalogLoadResponse {
    pub accepted: usize,
    pub rejected: Vec<RejectedRecord>,
}

/// Lists catalog garments, optionally only those eligible for a role
pub async fn list_garments(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GarmentQuery>,
) -> AppResult<Json<Vec<Garment>>> {
    let catalog = state.catalog.read().await.clone();

    let garments = match params.role {
        Some(role) => {
            let role: Role = role.parse().map_err(AppError::InvalidInput)?;
            catalog.candidates(role).into_iter().cloned().collect()
        }
        None => catalog.garments().to_vec(),
    };

    Ok(Json(garments))
}

/// Replaces the shared catalog with a new bulk load
pub async fn replace_catalog(
    State(state): State<Arc<AppState>>,
    Json(rows): Json<Vec<Value>>,
) -> Json<CatalogLoadResponse> {
    let (catalog, rejected) = GarmentCatalog::from_values(rows);
    let accepted = catalog.len();
    state.replace_catalog(catalog).await;

    Json(CatalogLoadResponse { accepted, rejected })
}
