use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;

use crate::error::{AppError, FieldErrors};

pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

/// JSON body that has been deserialized and passed [`Validate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        value.validate().map_err(|fields| {
            tracing::warn!(fields = ?fields.keys().collect::<Vec<_>>(), "validation failed");
            AppError::Validation(fields)
        })?;

        Ok(ValidatedJson(value))
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Accumulates per-field complaints; the first complaint for a field wins.
#[derive(Debug, Default)]
pub struct Checks {
    errors: FieldErrors,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, field: &'static str, message: String) {
        self.errors.entry(field).or_insert(message);
    }

    pub fn not_blank(&mut self, field: &'static str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.fail(field, "must not be blank".into());
        }
        self
    }

    pub fn length(&mut self, field: &'static str, value: &str, min: usize, max: usize) -> &mut Self {
        let len = value.chars().count();
        if len < min || len > max {
            self.fail(field, format!("size must be between {min} and {max}"));
        }
        self
    }

    pub fn max_length(&mut self, field: &'static str, value: &str, max: usize) -> &mut Self {
        if value.chars().count() > max {
            self.fail(field, format!("size must be at most {max}"));
        }
        self
    }

    pub fn email(&mut self, field: &'static str, value: &str) -> &mut Self {
        if !is_valid_email(value) {
            self.fail(field, "must be a well-formed email address".into());
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}
