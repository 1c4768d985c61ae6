use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{JwtResponse, LoginRequest, SignupRequest, UserInfoResponse},
        services::{authenticate, register, resolve_principal},
    },
    error::AppError,
    response::ApiResponse,
    state::AppState,
    validation::ValidatedJson,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/validate-token", post(validate_token))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> Result<Json<ApiResponse>, AppError> {
    register(
        state.users.as_ref(),
        &payload.username,
        &payload.email,
        &payload.password,
    )
    .await?;

    Ok(Json(ApiResponse::message("User registered successfully!")))
}

#[instrument(skip(state, payload))]
pub async fn signin(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<JwtResponse>>, AppError> {
    let principal = authenticate(state.users.as_ref(), &payload.username, &payload.password).await?;
    let token = state.tokens.issue(&principal.username)?;

    info!(user_id = principal.id, "user logged in");
    Ok(Json(ApiResponse::success(
        "Login successful",
        JwtResponse::new(token, principal),
    )))
}

#[instrument(skip(state, headers))]
pub async fn validate_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<UserInfoResponse>>, AppError> {
    let authorization = headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok());
    let principal = resolve_principal(&state.tokens, state.users.as_ref(), authorization).await?;

    Ok(Json(ApiResponse::success(
        "Token is valid.",
        UserInfoResponse::from(principal),
    )))
}
