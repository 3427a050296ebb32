use famtree_common::error::{FamtreeError, FamtreeResult};
use serde::Deserialize;
use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://family_tree.db";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub recent_people_limit: i64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    /// Loads `.env` file if present. Every variable has a default so a CGI
    /// invocation with a bare environment still works.
    pub fn from_env() -> FamtreeResult<Self> {
        // Best-effort .env load; ignore if missing
        let _ = dotenvy::dotenv();

        let recent_people_limit: i64 = get_var_or("RECENT_PEOPLE_LIMIT", "5")
            .parse()
            .map_err(|e| FamtreeError::Config(format!("invalid RECENT_PEOPLE_LIMIT: {e}")))?;
        if recent_people_limit <= 0 {
            return Err(FamtreeError::Config(
                "RECENT_PEOPLE_LIMIT must be positive".to_string(),
            ));
        }

        Ok(Self {
            database_url: get_var_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            host: get_var_or("HOST", "127.0.0.1"),
            port: get_var_or("PORT", "8080")
                .parse()
                .map_err(|e| FamtreeError::Config(format!("invalid PORT: {e}")))?,
            log_level: get_var_or("LOG_LEVEL", "info"),
            recent_people_limit,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn get_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}
