use std::sync::Arc;

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use super::claims::Claims;
use crate::{clock::Clock, config::JwtConfig};

/// Why a presented token was not accepted.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token malformed")]
    Malformed,
    #[error("token signature invalid")]
    SignatureInvalid,
    #[error("no token provided")]
    Missing,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => Self::SignatureInvalid,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Malformed,
        }
    }
}

/// Issues and checks HS256 bearer tokens bound to a username.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(cfg: &JwtConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::seconds(cfg.ttl_seconds),
            clock,
        }
    }

    pub fn issue(&self, subject: &str) -> anyhow::Result<String> {
        anyhow::ensure!(!subject.is_empty(), "token subject must not be empty");
        let now = self.clock.now();
        let exp = now + self.ttl;
        let claims = Claims {
            sub: subject.to_owned(),
            iat: now.unix_timestamp(),
            exp: exp.unix_timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(subject, exp = claims.exp, "jwt signed");
        Ok(token)
    }

    /// Checks format, signature, issuer, audience and expiry.
    ///
    /// Expiry is compared against the injected clock with no leeway: a token
    /// stops being valid at the second stored in `exp`.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));

        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| {
                let err = TokenError::from(e);
                warn!(reason = %err, "jwt rejected");
                err
            })?
            .claims;

        if self.clock.now().unix_timestamp() >= claims.exp {
            warn!(subject = %claims.sub, exp = claims.exp, "jwt expired");
            return Err(TokenError::Expired);
        }

        debug!(subject = %claims.sub, "jwt verified");
        Ok(claims)
    }

    pub fn validate(&self, token: &str) -> bool {
        self.verify(token).is_ok()
    }

    /// Subject of a token, available only once the token verifies.
    pub fn subject_of(&self, token: &str) -> Result<String, TokenError> {
        self.verify(token).map(|claims| claims.sub)
    }
}
