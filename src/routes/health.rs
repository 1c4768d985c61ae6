use axum::{extract::State, Json};
use serde::Serialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::{response::ApiResponse, state::AppState};

const SERVICE_NAME: &str = "authgate";

#[derive(Debug, Serialize)]
pub struct HealthInfo {
    pub status: &'static str,
    pub timestamp: String,
    pub service: &'static str,
}

pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthInfo>> {
    let now: OffsetDateTime = state.clock.now();
    Json(ApiResponse::success(
        "Service is running",
        HealthInfo {
            status: "UP",
            timestamp: now.format(&Rfc3339).unwrap_or_default(),
            service: SERVICE_NAME,
        },
    ))
}
