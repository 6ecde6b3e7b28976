//! Environment configuration, read once at startup.

use std::net::SocketAddr;
use std::time::Duration;

use eyre::{WrapErr, eyre};

use psicotest_auth::jwt::MIN_SECRET_LENGTH;
use psicotest_storage::connection::DatabaseConfig;

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_TOKEN_TTL_HOURS: u64 = 168;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub database: DatabaseConfig,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    /// Enables language-model interpretation when set.
    pub bedrock_model_id: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup. Blank values count as
    /// unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind = get("PSICOTEST_BIND")
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
            .parse::<SocketAddr>()
            .wrap_err("PSICOTEST_BIND must be host:port")?;

        let jwt_secret = get("JWT_SECRET").ok_or_else(|| eyre!("JWT_SECRET is required"))?;
        if jwt_secret.len() < MIN_SECRET_LENGTH {
            return Err(eyre!("JWT_SECRET must be at least {MIN_SECRET_LENGTH} bytes"));
        }

        let defaults = DatabaseConfig::default();
        let database = DatabaseConfig {
            url: get("DATABASE_URL").unwrap_or(defaults.url),
            max_connections: number(&get, "DB_MAX_CONNECTIONS")?
                .map(|n| n as u32)
                .unwrap_or(defaults.max_connections),
            connect_timeout: number(&get, "DB_CONNECT_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
            probe_interval: number(&get, "DB_PROBE_INTERVAL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.probe_interval),
        };

        let ttl_hours = number(&get, "TOKEN_TTL_HOURS")?.unwrap_or(DEFAULT_TOKEN_TTL_HOURS);

        Ok(Self {
            bind,
            database,
            jwt_secret,
            token_ttl: Duration::from_secs(ttl_hours * 3600),
            bedrock_model_id: get("BEDROCK_MODEL_ID"),
        })
    }
}

/// A positive integer setting.
fn number(get: &impl Fn(&str) -> Option<String>, key: &str) -> eyre::Result<Option<u64>> {
    let Some(raw) = get(key) else {
        return Ok(None);
    };
    let value: u64 = raw
        .trim()
        .parse()
        .wrap_err_with(|| format!("{key} must be a positive integer, got {raw:?}"))?;
    if value == 0 || value > u64::from(u32::MAX) {
        return Err(eyre!("{key} out of range: {value}"));
    }
    Ok(Some(value))
}
