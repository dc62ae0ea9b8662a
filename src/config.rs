//! Process configuration read once from the environment.

use std::net::SocketAddr;

use anyhow::Context;

pub const DEV_JWT_SECRET: &str = "dev-secret-do-not-use-in-production";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Clone)]
pub struct Config {
    /// `DATABASE_URL`, e.g. `sqlite://todos.db`
    pub database_url: String,
    pub listen_addr: SocketAddr,
    /// HMAC key for session tokens
    pub jwt_secret: String,
    /// The single origin allowed by CORS
    pub cors_origin: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = std::env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()).unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set, using the development secret");
            DEV_JWT_SECRET.to_string()
        });
        let listen_addr = std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://todos.db".to_string()),
            listen_addr: listen_addr.parse().with_context(|| format!("invalid LISTEN_ADDR {listen_addr:?}"))?,
            jwt_secret,
            cors_origin: std::env::var("CORS_ORIGIN").ok().filter(|s| !s.is_empty()).unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
        })
    }
}
