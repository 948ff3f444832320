use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::{Value, json};
use tracing::info;

/// Accepts an image inventory and echoes it back.
pub async fn receive_inventory(Json(data): Json<Value>) -> impl IntoResponse {
    info!("Received JSON data: {}", data);
    (
        StatusCode::OK,
        Json(json!({"status": "success", "received_data": data})),
    )
}

pub fn create_app() -> Router {
    Router::new().route("/endpoint", post(receive_inventory))
}
