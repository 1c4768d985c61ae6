use axum::Json;

use crate::response::ApiResponse;

pub async fn home() -> Json<ApiResponse> {
    Json(ApiResponse::message("authgate API server is up and running."))
}

pub async fn public() -> Json<ApiResponse> {
    Json(ApiResponse::message(
        "Public endpoint - reachable without authentication.",
    ))
}
