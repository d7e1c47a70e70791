use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use std::{collections::HashMap, sync::Arc};

use crate::routes::AppState;

/// Returns when each garment was last recommended
pub async fn get_history(
    State(state): State<Arc<AppState>>,
) -> Json<HashMap<String, DateTime<Utc>>> {
    Json(state.history.snapshot())
}
