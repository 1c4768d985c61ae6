use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    auth::{
        jwt::TokenService,
        memory::MemoryUserStore,
        repo::{PgUserStore, UserStore},
    },
    clock::{Clock, SystemClock},
    config::AppConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub tokens: Arc<TokenService>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let users: Arc<dyn UserStore> = match &config.database_url {
            Some(url) => {
                let db = PgPoolOptions::new()
                    .max_connections(10)
                    .connect(url)
                    .await
                    .context("connect to database")?;
                sqlx::migrate!("./migrations")
                    .run(&db)
                    .await
                    .context("run migrations")?;
                tracing::info!("using postgres user store");
                Arc::new(PgUserStore::new(db))
            }
            None => {
                tracing::warn!("DATABASE_URL not set; users are kept in memory and lost on restart");
                Arc::new(MemoryUserStore::new())
            }
        };

        Ok(Self::from_parts(&config, users, Arc::new(SystemClock)))
    }

    pub fn from_parts(config: &AppConfig, users: Arc<dyn UserStore>, clock: Arc<dyn Clock>) -> Self {
        let tokens = Arc::new(TokenService::new(&config.jwt, clock.clone()));
        Self {
            users,
            tokens,
            clock,
        }
    }

    #[cfg(test)]
    pub fn fake(ttl_seconds: i64, clock: Arc<dyn Clock>) -> Self {
        Self::from_parts(
            &AppConfig::for_tests(ttl_seconds),
            Arc::new(MemoryUserStore::new()),
            clock,
        )
    }
}

#[cfg(test)]
mod tests {
    use time::Duration;

    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn from_parts_hands_jwt_settings_to_the_token_service() {
        let clock = Arc::new(ManualClock::starting_now());
        let state = AppState::from_parts(
            &AppConfig::for_tests(30),
            Arc::new(MemoryUserStore::new()),
            clock.clone(),
        );

        let claims = state.tokens.verify(&state.tokens.issue("alice").unwrap()).unwrap();
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        assert_eq!(claims.exp - claims.iat, 30);

        clock.advance(Duration::seconds(30));
        assert_eq!(state.clock.now(), clock.now());
    }
}
