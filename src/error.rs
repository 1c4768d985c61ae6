use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    auth::{
        jwt::TokenError,
        services::{AccessFailure, AuthFailure, SignupFailure},
    },
    response::ApiResponse,
};

/// Field name to human-readable complaint.
pub type FieldErrors = BTreeMap<&'static str, String>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("input validation failed")]
    Validation(FieldErrors),

    #[error("malformed request body: {0}")]
    BadRequest(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("username already taken")]
    UsernameTaken,

    #[error("email already in use")]
    EmailTaken,

    /// Token problems on the validate-token endpoint; a missing token is a 400 there.
    #[error("token rejected: {0}")]
    Token(TokenError),

    /// Any token problem on a protected route.
    #[error("authentication required: {0}")]
    Unauthenticated(TokenError),

    #[error("user not found")]
    UserNotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::BadRequest(_)
            | Self::InvalidCredentials
            | Self::UsernameTaken
            | Self::EmailTaken
            | Self::Token(TokenError::Missing) => StatusCode::BAD_REQUEST,
            Self::Token(_) | Self::Unauthenticated(_) | Self::UserNotFound => {
                StatusCode::UNAUTHORIZED
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text shown to the client. Internal detail never appears here.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Input validation failed",
            Self::BadRequest(_) => "Malformed request body",
            Self::InvalidCredentials => "Invalid username or password.",
            Self::UsernameTaken => "Error: Username is already taken!",
            Self::EmailTaken => "Error: Email is already in use!",
            Self::Token(kind) | Self::Unauthenticated(kind) => match kind {
                TokenError::Missing => "No token provided.",
                TokenError::Expired => "Token has expired. Please sign in again.",
                TokenError::SignatureInvalid => "Token signature is invalid.",
                TokenError::Malformed => "Token is invalid.",
            },
            Self::UserNotFound => "User not found.",
            Self::Internal(_) => "An internal server error occurred.",
        }
    }
}

impl From<AuthFailure> for AppError {
    fn from(err: AuthFailure) -> Self {
        match err {
            AuthFailure::InvalidCredentials => Self::InvalidCredentials,
            AuthFailure::Internal(e) => Self::Internal(e),
        }
    }
}

impl From<SignupFailure> for AppError {
    fn from(err: SignupFailure) -> Self {
        match err {
            SignupFailure::UsernameTaken => Self::UsernameTaken,
            SignupFailure::EmailTaken => Self::EmailTaken,
            SignupFailure::Internal(e) => Self::Internal(e),
        }
    }
}

impl From<AccessFailure> for AppError {
    fn from(err: AccessFailure) -> Self {
        match err {
            AccessFailure::Token(kind) => Self::Token(kind),
            AccessFailure::UserNotFound => Self::UserNotFound,
            AccessFailure::Internal(e) => Self::Internal(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.public_message();

        let body = match self {
            Self::Validation(fields) => ApiResponse {
                success: false,
                message: message.to_owned(),
                data: serde_json::to_value(fields).ok(),
            },
            Self::Internal(e) => {
                tracing::error!(error = ?e, "internal error");
                ApiResponse::error(message)
            }
            Self::BadRequest(detail) => {
                tracing::warn!(%detail, "rejected request body");
                ApiResponse::error(message)
            }
            _ => ApiResponse::error(message),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::UsernameTaken.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Token(TokenError::Missing).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Token(TokenError::Expired).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Unauthenticated(TokenError::Missing).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::UserNotFound.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("db down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn internal_detail_is_not_echoed() {
        let res = AppError::Internal(anyhow::anyhow!("password=hunter2 connection reset"))
            .into_response();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!text.contains("hunter2"));
        assert!(text.contains("\"success\":false"));
    }

    #[tokio::test]
    async fn validation_errors_carry_fields_in_data() {
        let mut fields = FieldErrors::new();
        fields.insert("username", "must not be blank".into());
        let res = AppError::Validation(fields).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["data"]["username"], "must not be blank");
        assert_eq!(body["message"], "Input validation failed");
    }
}
