use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_TTL_MINUTES: i64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

impl JwtConfig {
    /// Config for tests and local tooling; never read from the environment.
    pub fn for_tests(secret: &str) -> Self {
        Self {
            secret: secret.into(),
            issuer: "tasklist-test".into(),
            audience: "tasklist-test-users".into(),
            ttl_minutes: DEFAULT_TTL_MINUTES,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let database_max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let secret = std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        anyhow::ensure!(!secret.trim().is_empty(), "JWT_SECRET must not be empty");

        let ttl_minutes = std::env::var("JWT_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(DEFAULT_TTL_MINUTES);
        anyhow::ensure!(ttl_minutes > 0, "JWT_TTL_MINUTES must be positive");

        let jwt = JwtConfig {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "tasklist".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "tasklist-users".into()),
            ttl_minutes,
        };
        Ok(Self {
            database_url,
            database_max_connections,
            jwt,
        })
    }
}
