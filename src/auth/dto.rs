use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    auth::services::Principal,
    error::FieldErrors,
    validation::{Checks, Validate},
};

/// Scheme name returned with every issued token.
pub const TOKEN_TYPE: &str = "Bearer";

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for SignupRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Checks::new()
            .not_blank("username", &self.username)
            .length("username", &self.username, 3, 20)
            .not_blank("email", &self.email)
            .max_length("email", &self.email, 50)
            .email("email", &self.email)
            .not_blank("password", &self.password)
            .length("password", &self.password, 6, 40)
            .finish()
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Checks::new()
            .not_blank("username", &self.username)
            .not_blank("password", &self.password)
            .finish()
    }
}

/// Returned after a successful signin.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl JwtResponse {
    pub fn new(access_token: String, principal: Principal) -> Self {
        Self {
            access_token,
            token_type: TOKEN_TYPE,
            id: principal.id,
            username: principal.username,
            email: principal.email,
        }
    }
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Principal> for UserInfoResponse {
    fn from(p: Principal) -> Self {
        Self {
            id: p.id,
            username: p.username,
            email: p.email,
            created_at: p.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn principal() -> Principal {
        Principal {
            id: 7,
            username: "alice".into(),
            email: "alice@x.com".into(),
            created_at: datetime!(2024-03-01 12:00 UTC),
        }
    }

    #[test]
    fn jwt_response_uses_camel_case_and_fixed_type() {
        let json = serde_json::to_value(JwtResponse::new("tok".into(), principal())).unwrap();
        assert_eq!(json["accessToken"], "tok");
        assert_eq!(json["tokenType"], "Bearer");
        assert_eq!(json["id"], 7);
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn user_info_has_rfc3339_created_at() {
        let json = serde_json::to_value(UserInfoResponse::from(principal())).unwrap();
        assert_eq!(json["createdAt"], "2024-03-01T12:00:00Z");
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn signup_rules() {
        let ok = SignupRequest {
            username: "alice".into(),
            email: "alice@x.com".into(),
            password: "Secret123".into(),
        };
        assert!(ok.validate().is_ok());

        let bad = SignupRequest {
            username: "al".into(),
            email: "not-an-email".into(),
            password: "123".into(),
        };
        let errs = bad.validate().unwrap_err();
        assert_eq!(
            errs.keys().copied().collect::<Vec<_>>(),
            vec!["email", "password", "username"]
        );
    }

    #[test]
    fn login_requires_both_fields() {
        let errs = LoginRequest {
            username: String::new(),
            password: " ".into(),
        }
        .validate()
        .unwrap_err();
        assert!(errs.contains_key("username"));
        assert!(errs.contains_key("password"));
    }
}
