use tracing::warn;

use crate::auth::TokenConfig;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 30;
const DEV_JWT_SECRET: &str = "your-secret-key-change-in-production";

/// Process-wide settings, read once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// When unset the server runs on the in-memory stores
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub bind_address: String,
    pub jwt_secret: String,
    pub access_token_expire_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't touch the process env
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        let bind_address =
            lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            warn!("JWT_SECRET not set, falling back to the development secret");
            DEV_JWT_SECRET.to_string()
        });

        let access_token_expire_minutes = lookup("ACCESS_TOKEN_EXPIRE_MINUTES")
            .and_then(|s| s.parse().ok())
            .filter(|minutes: &i64| *minutes > 0)
            .unwrap_or(DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES);

        Self {
            database_url,
            max_connections,
            bind_address,
            jwt_secret,
            access_token_expire_minutes,
        }
    }

    pub fn token_config(&self) -> TokenConfig {
        TokenConfig::new(self.jwt_secret.clone(), self.access_token_expire_minutes)
    }
}
