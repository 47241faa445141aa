use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub extractor: ExtractorConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub uri: String,
    pub name: String,
    pub users_collection: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(skip_serializing)]
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl ExtractorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    /// Build the configuration from process environment.
    ///
    /// `MONGODB_URI` and `NEXTAUTH_SECRET` are required; everything else
    /// falls back to per-environment defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reading keys through `lookup`.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let uri = lookup("MONGODB_URI")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("MONGODB_URI"))?;
        let secret = lookup("NEXTAUTH_SECRET")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("NEXTAUTH_SECRET"))?;

        let defaults = match environment {
            Environment::Production => Defaults::production(),
            Environment::Staging => Defaults::staging(),
            Environment::Development => Defaults::development(),
        };

        let mut config = Self {
            environment,
            server: ServerConfig {
                host: defaults.host.to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                uri,
                name: "clarityweb".to_string(),
                users_collection: "users".to_string(),
            },
            auth: AuthConfig { secret },
            extractor: ExtractorConfig {
                url: "http://127.0.0.1:8788/extract".to_string(),
                timeout_secs: defaults.extractor_timeout_secs,
            },
            security: SecurityConfig {
                cors_origins: defaults.cors_origins.iter().map(|s| s.to_string()).collect(),
            },
        };

        // Server overrides
        if let Some(v) = lookup("CLARITY_HOST") {
            config.server.host = v;
        }
        if let Some(v) = lookup("CLARITY_PORT").or_else(|| lookup("PORT")) {
            config.server.port = v
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value: v.clone() })?;
        }

        // Database overrides
        if let Some(v) = lookup("MONGODB_DB") {
            config.database.name = v;
        }
        if let Some(v) = lookup("MONGODB_USERS_COLLECTION") {
            config.database.users_collection = v;
        }

        // Extractor overrides
        if let Some(v) = lookup("EXTRACTOR_URL") {
            url::Url::parse(&v)
                .map_err(|_| ConfigError::Invalid { key: "EXTRACTOR_URL", value: v.clone() })?;
            config.extractor.url = v;
        }
        if let Some(v) = lookup("EXTRACTOR_TIMEOUT_SECS") {
            config.extractor.timeout_secs = v
                .parse()
                .ok()
                .filter(|secs: &u64| *secs > 0)
                .ok_or_else(|| ConfigError::Invalid { key: "EXTRACTOR_TIMEOUT_SECS", value: v.clone() })?;
        }

        // Security overrides
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            config.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

struct Defaults {
    host: &'static str,
    extractor_timeout_secs: u64,
    cors_origins: &'static [&'static str],
}

impl Defaults {
    fn development() -> Self {
        Self {
            host: "127.0.0.1",
            extractor_timeout_secs: 30,
            cors_origins: &["http://localhost:3000", "http://localhost:5173"],
        }
    }

    fn staging() -> Self {
        Self {
            host: "0.0.0.0",
            extractor_timeout_secs: 15,
            cors_origins: &["https://staging.clarityweb.app"],
        }
    }

    fn production() -> Self {
        Self {
            host: "0.0.0.0",
            extractor_timeout_secs: 10,
            cors_origins: &["https://clarityweb.app"],
        }
    }
}
