use anyhow::{bail, Context};

/// HS256 keys shorter than the digest size are rejected at startup.
const MIN_SECRET_BYTES: usize = 32;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_seconds: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` selects the in-memory user store.
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET").context("JWT_SECRET must be set")?;
        if secret.len() < MIN_SECRET_BYTES {
            bail!(
                "JWT_SECRET must be at least {} bytes, got {}",
                MIN_SECRET_BYTES,
                secret.len()
            );
        }

        let ttl_seconds = match lookup("JWT_TTL_SECONDS") {
            Some(v) => v
                .parse::<i64>()
                .with_context(|| format!("JWT_TTL_SECONDS is not an integer: {v}"))?,
            None => 60 * 60 * 24,
        };
        if ttl_seconds <= 0 {
            bail!("JWT_TTL_SECONDS must be positive, got {}", ttl_seconds);
        }

        let jwt = JwtConfig {
            secret,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "authgate".into()),
            audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| "authgate-users".into()),
            ttl_seconds,
        };

        let port = match lookup("APP_PORT") {
            Some(v) => v
                .parse::<u16>()
                .with_context(|| format!("APP_PORT is not a valid port: {v}"))?,
            None => 8080,
        };

        Ok(Self {
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            database_url: lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()),
            jwt,
        })
    }

    #[cfg(test)]
    pub fn for_tests(ttl_seconds: i64) -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            database_url: None,
            jwt: JwtConfig {
                secret: "test-secret-that-is-long-enough-for-hs256".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_seconds,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let cfg = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", SECRET)])).unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8080);
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.jwt.issuer, "authgate");
        assert_eq!(cfg.jwt.audience, "authgate-users");
        assert_eq!(cfg.jwt.ttl_seconds, 86_400);
    }

    #[test]
    fn reads_overrides() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("JWT_TTL_SECONDS", "1"),
            ("JWT_ISSUER", "iss"),
            ("APP_PORT", "9000"),
            ("DATABASE_URL", "postgres://localhost/auth"),
        ]))
        .unwrap();
        assert_eq!(cfg.jwt.ttl_seconds, 1);
        assert_eq!(cfg.jwt.issuer, "iss");
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/auth"));
    }

    #[test]
    fn rejects_missing_or_short_secret() {
        assert!(AppConfig::from_lookup(lookup_from(&[])).is_err());
        let err = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "short")])).unwrap_err();
        assert!(err.to_string().contains("at least 32 bytes"));
    }

    #[test]
    fn rejects_non_positive_ttl() {
        for ttl in ["0", "-5", "soon"] {
            let res = AppConfig::from_lookup(lookup_from(&[
                ("JWT_SECRET", SECRET),
                ("JWT_TTL_SECONDS", ttl),
            ]));
            assert!(res.is_err(), "ttl {ttl} should be rejected");
        }
    }

    #[test]
    fn blank_database_url_means_memory_store() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("DATABASE_URL", "  "),
        ]))
        .unwrap();
        assert!(cfg.database_url.is_none());
    }
}
