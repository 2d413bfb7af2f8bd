//! Process settings from the environment (and `.env` when present).

use crate::error::ConfigError;

#[derive(Clone, Debug)]
pub struct ServerSettings {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    /// Resource config file; None serves only the routes registered in code.
    pub config_path: Option<String>,
}

impl ServerSettings {
    /// `DATABASE_URL` (default `postgres://localhost/crud`), `BIND_ADDR` (default `0.0.0.0:3000`),
    /// `MAX_CONNECTIONS` (default 5), `CONFIG_PATH` (optional).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_connections = match lookup("MAX_CONNECTIONS") {
            Some(v) => v
                .parse()
                .map_err(|_| ConfigError::Validation(format!("MAX_CONNECTIONS must be a positive integer, got '{}'", v)))?,
            None => 5,
        };
        Ok(ServerSettings {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "postgres://localhost/crud".into()),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
            max_connections,
            config_path: lookup("CONFIG_PATH").filter(|s| !s.is_empty()),
        })
    }
}
