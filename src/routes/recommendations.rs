use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Recommendation, RequirementScores, WeatherReading, WeatherRecord, WeatherSource},
    routes::AppState,
    services::{compute_requirements, GarmentCatalog, RejectedRecord},
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    /// City to fetch weather for when no reading is supplied
    #[serde(default)]
    pub city: Option<String>,
    /// Weather reading supplied by the caller; takes precedence over `city`
    #[serde(default)]
    pub weather: Option<WeatherRecord>,
    /// Garments to choose from instead of the shared catalog
    #[serde(default)]
    pub wardrobe: Option<Vec<Value>>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub request_id: RequestId,
    #[serde(flatten)]
    pub recommendation: Recommendation,
    /// Rows of a caller-supplied wardrobe that were left out
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected_rows: Vec<RejectedRecord>,
}

/// Handler for outfit recommendations
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        city = ?request.city,
        supplied_weather = request.weather.is_some(),
        wardrobe_size = ?request.wardrobe.as_ref().map(Vec::len),
        "Processing recommendation request"
    );

    let weather = resolve_weather(&state, request.weather, request.city).await?;
    let engine = state.engine().await;

    let (wardrobe, rejected_rows) = match request.wardrobe {
        Some(rows) => {
            let (wardrobe, rejected) = GarmentCatalog::from_values(rows);
            if !rejected.is_empty() {
                tracing::info!(
                    request_id = %request_id,
                    rejected = rejected.len(),
                    "Supplied wardrobe had unusable rows"
                );
            }
            (Some(wardrobe), rejected)
        }
        None => (None, Vec::new()),
    };

    // Recording history may touch the disk while holding its lock
    let task_weather = weather.clone();
    let result = tokio::task::spawn_blocking(move || match wardrobe {
        Some(wardrobe) => engine.recommend_from(&task_weather, &wardrobe),
        None => engine.recommend(&task_weather),
    })
    .await
    .map_err(|e| AppError::Internal(format!("Recommendation task failed: {}", e)))?;

    let recommendation = result.map_err(|e| {
        tracing::info!(request_id = %request_id, reason = %e, "No outfit recommended");
        AppError::recommendation(e, weather, rejected_rows.clone())
    })?;

    tracing::info!(request_id = %request_id, "Recommendation completed");

    Ok(Json(RecommendationResponse {
        request_id,
        recommendation,
        rejected_rows,
    }))
}

async fn resolve_weather(
    state: &AppState,
    supplied: Option<WeatherRecord>,
    city: Option<String>,
) -> AppResult<WeatherReading> {
    match (supplied, city) {
        (Some(mut record), city) => {
            if record.city.is_none() {
                record.city = city;
            }
            Ok(WeatherReading::normalize(record, WeatherSource::Supplied)?)
        }
        (None, Some(city)) if !city.trim().is_empty() => {
            tracing::debug!(provider = state.weather.name(), city = %city, "Fetching weather");
            state.weather.current(city.trim()).await
        }
        _ => Err(AppError::InvalidInput(
            "Provide either a weather reading or a city".to_string(),
        )),
    }
}

/// Handler translating a weather reading into requirement scores
pub async fn requirements(
    Query(record): Query<WeatherRecord>,
) -> AppResult<Json<RequirementScores>> {
    let weather = WeatherReading::normalize(record, WeatherSource::Supplied)?;
    Ok(Json(compute_requirements(&weather)))
}
