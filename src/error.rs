use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{
    models::{WeatherError, WeatherReading},
    services::{RecommendationError, RejectedRecord},
};

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed weather reading: {0}")]
    MalformedWeather(#[from] WeatherError),

    #[error("Weather unavailable: {0}")]
    WeatherUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{source}")]
    Recommendation {
        #[source]
        source: RecommendationError,
        weather: Box<WeatherReading>,
        rejected_rows: Vec<RejectedRecord>,
    },
}

impl AppError {
    /// Attaches the weather the failed recommendation was computed for, and
    /// any supplied wardrobe rows that never made it into the candidate pool
    pub fn recommendation(
        source: RecommendationError,
        weather: WeatherReading,
        rejected_rows: Vec<RejectedRecord>,
    ) -> Self {
        AppError::Recommendation {
            source,
            weather: Box::new(weather),
            rejected_rows,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Recommendation {
            source,
            weather,
            rejected_rows,
        } = &self
        {
            let missing = match source {
                RecommendationError::InsufficientWardrobe { missing, .. } => missing.clone(),
                RecommendationError::EmptyCatalog { .. } => Vec::new(),
            };
            let mut body = json!({
                "error": source.to_string(),
                "weather": weather,
                "requirements": source.requirements(),
                "missing_roles": missing,
            });
            if !rejected_rows.is_empty() {
                body["rejected_rows"] = json!(rejected_rows);
            }
            let body = Json(body);
            return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
        }

        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::MalformedWeather(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::WeatherUnavailable(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Io(_) | AppError::Recommendation { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
