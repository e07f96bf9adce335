use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let database = state.db.health_check().await;
    Json(json!({ "status": "ok", "database": database }))
}
