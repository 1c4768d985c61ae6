use axum::{routing::get, Json, Router};
use tracing::instrument;

use crate::{
    auth::{dto::UserInfoResponse, extractors::CurrentUser},
    response::ApiResponse,
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/profile", get(profile))
        .route("/test", get(test_endpoint))
}

#[instrument(skip_all)]
pub async fn me(CurrentUser(principal): CurrentUser) -> Json<ApiResponse<UserInfoResponse>> {
    Json(ApiResponse::success(
        "User info retrieved",
        UserInfoResponse::from(principal),
    ))
}

#[instrument(skip_all)]
pub async fn profile(CurrentUser(principal): CurrentUser) -> Json<ApiResponse<UserInfoResponse>> {
    Json(ApiResponse::success(
        "Profile retrieved",
        UserInfoResponse::from(principal),
    ))
}

pub async fn test_endpoint(CurrentUser(_): CurrentUser) -> Json<ApiResponse> {
    Json(ApiResponse::message(
        "This endpoint is only reachable by authenticated users.",
    ))
}
