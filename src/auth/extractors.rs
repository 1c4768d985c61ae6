use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::services::{resolve_principal, AccessFailure, Principal};
use crate::{error::AppError, state::AppState};

/// Validates the bearer token and loads the user behind it.
///
/// Every token problem, including a missing header, is a 401 here.
pub struct CurrentUser(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let authorization = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match resolve_principal(&state.tokens, state.users.as_ref(), authorization).await {
            Ok(principal) => Ok(CurrentUser(principal)),
            Err(AccessFailure::Token(kind)) => Err(AppError::Unauthenticated(kind)),
            Err(other) => Err(other.into()),
        }
    }
}
