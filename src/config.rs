use std::fmt;
use std::time::Duration;

use anyhow::Result;
use moka::future::Cache;
use sea_orm::{Database, DatabaseConnection};
use tracing::{debug, info, warn};

use crate::schemas::{AppState, CachedData};

pub const DEFAULT_JWT_SECRET: &str = "super-secret-change-me";
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 1440;

/// Settings read from the environment at startup.
#[derive(Clone)]
pub struct AppConfig {
    /// HS256 signing secret for access tokens
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    /// Allowed CORS origins; empty means any origin.
    pub cors_origins: Vec<String>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
            cors_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Reads `JWT_SECRET`, `ACCESS_TOKEN_EXPIRE_MINUTES` and `CORS_ORIGINS`
    /// (comma separated), falling back to the defaults.
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET is not set, using the insecure default secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        let token_ttl_minutes = match std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("Invalid ACCESS_TOKEN_EXPIRE_MINUTES '{}', using {}", raw, DEFAULT_TOKEN_TTL_MINUTES);
                DEFAULT_TOKEN_TTL_MINUTES
            }),
            Err(_) => DEFAULT_TOKEN_TTL_MINUTES,
        };

        let cors_origins = std::env::var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let config = Self {
            jwt_secret,
            token_ttl_minutes,
            cors_origins,
        };
        debug!(?config, "Loaded configuration");
        config
    }
}

/// Cache for the annual table and family summary, 5 minute TTL.
pub fn build_cache() -> Cache<String, CachedData> {
    Cache::builder()
        .max_capacity(1000)
        .time_to_live(Duration::from_secs(300))
        .build()
}

/// Build application state around an open connection
pub fn initialize_app_state(db: DatabaseConnection) -> AppState {
    AppState {
        db,
        cache: build_cache(),
        config: AppConfig::from_env(),
        calculator: compute::default_calculator(),
    }
}

/// Initialize application state with a specific database URL
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;
    Ok(initialize_app_state(db))
}
