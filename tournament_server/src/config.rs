//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::net::SocketAddr;
use tournament_oracle::{
    config::{ManagerConfig, OracleConfig},
    ids::Identity,
};

const DEFAULT_BIND: &str = "127.0.0.1:6969";

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Prometheus scrape address, metrics disabled when unset
    pub metrics_bind: Option<SocketAddr>,
    /// Caller token signing secret (required)
    pub jwt_secret: String,
    /// Oracle administrator, the only identity allowed to manage reporters
    pub oracle_admin: Identity,
    /// Reporters authorized at startup
    pub reporters: Vec<Identity>,
    pub oracle: OracleConfig,
    pub manager: ManagerConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or invalid
    pub fn from_env(bind_override: Option<SocketAddr>) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(bind) => bind,
            None => match parse_addr("SERVER_BIND")? {
                Some(bind) => bind,
                None => default_bind()?,
            },
        };

        let metrics_bind = parse_addr("METRICS_BIND")?;

        let jwt_secret = std::env::var("JWT_SECRET").map_err(|_| ConfigError::MissingRequired {
            var: "JWT_SECRET".to_string(),
            hint: "Generate with: openssl rand -hex 32".to_string(),
        })?;

        let oracle_admin = std::env::var("ORACLE_ADMIN")
            .ok()
            .map(|admin| admin.trim().to_string())
            .filter(|admin| !admin.is_empty())
            .map(Identity::new)
            .ok_or_else(|| ConfigError::MissingRequired {
                var: "ORACLE_ADMIN".to_string(),
                hint: "Identity allowed to add and remove reporters".to_string(),
            })?;

        let reporters = std::env::var("ORACLE_REPORTERS")
            .map(|list| parse_identities(&list))
            .unwrap_or_default();

        Ok(ServerConfig {
            bind,
            metrics_bind,
            jwt_secret,
            oracle_admin,
            reporters,
            oracle: OracleConfig::from_env(),
            manager: ManagerConfig::from_env(),
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.len() < 32 {
            return Err(ConfigError::Invalid {
                var: "JWT_SECRET".to_string(),
                reason: "Must be at least 32 characters (128-bit security)".to_string(),
            });
        }

        if self.manager.min_participants == 0 {
            return Err(ConfigError::Invalid {
                var: "TOURNAMENT_MIN_PARTICIPANTS".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        let min = self.manager.min_participants;
        if self.manager.max_participants.is_some_and(|max| max < min) {
            return Err(ConfigError::Invalid {
                var: "TOURNAMENT_MAX_PARTICIPANTS".to_string(),
                reason: format!("Must not be below the minimum ({})", min),
            });
        }

        if self.metrics_bind == Some(self.bind) {
            return Err(ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: "Must differ from SERVER_BIND".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Split a comma separated identity list, dropping blanks
pub fn parse_identities(list: &str) -> Vec<Identity> {
    list.split(',')
        .map(str::trim)
        .filter(|identity| !identity.is_empty())
        .map(Identity::from)
        .collect()
}

fn parse_addr(key: &str) -> Result<Option<SocketAddr>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                var: key.to_string(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

fn default_bind() -> Result<SocketAddr, ConfigError> {
    DEFAULT_BIND.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
        var: "SERVER_BIND".to_string(),
        reason: e.to_string(),
    })
}
