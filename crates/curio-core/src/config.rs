//! Configuration module
//!
//! Environment-driven settings for the archive server: HTTP, database pool,
//! asset base URL, migration batching and the published IPFS gateway list.

use std::env;

use crate::constants::{
    DEFAULT_IPFS_GATEWAYS, DEFAULT_MIGRATION_BATCH_SIZE, MAX_MIGRATION_BATCH_SIZE,
};
use crate::validation::{is_absolute_http_url, validate_gateway_url};

// Common constants
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PORT: u16 = 4000;

/// Base configuration shared by every binary that serves HTTP
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
}

/// Archive server configuration
#[derive(Clone, Debug)]
pub struct ArchiveConfig {
    pub base: BaseConfig,
    pub database_url: String,
    /// Base URL legacy relative references are resolved against.
    pub asset_base_url: Option<String>,
    pub migration_batch_size: u32,
    /// System default gateways published to clients and used by the server pool.
    pub ipfs_gateways: Vec<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ArchiveConfig>);

impl Config {
    fn as_archive(&self) -> &ArchiveConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.as_archive().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ArchiveConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_archive().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_archive().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_archive().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_archive().base.environment
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_archive().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_archive().base.db_timeout_seconds
    }

    pub fn database_url(&self) -> &str {
        &self.as_archive().database_url
    }

    pub fn asset_base_url(&self) -> Option<&str> {
        self.as_archive().asset_base_url.as_deref()
    }

    pub fn migration_batch_size(&self) -> u32 {
        self.as_archive().migration_batch_size
    }

    pub fn ipfs_gateways(&self) -> &[String] {
        &self.as_archive().ipfs_gateways
    }
}

fn is_production_env(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl ArchiveConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins = split_list(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()));

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            environment,
        };

        let ipfs_gateways = env::var("IPFS_GATEWAYS")
            .ok()
            .map(|raw| split_list(&raw))
            .filter(|list| !list.is_empty())
            .unwrap_or_else(|| DEFAULT_IPFS_GATEWAYS.iter().map(|g| g.to_string()).collect());

        let config = ArchiveConfig {
            base,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            asset_base_url: env::var("ASSET_BASE_URL")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            migration_batch_size: env::var("MIGRATION_BATCH_SIZE")
                .unwrap_or_else(|_| DEFAULT_MIGRATION_BATCH_SIZE.to_string())
                .parse()
                .unwrap_or(DEFAULT_MIGRATION_BATCH_SIZE),
            ipfs_gateways,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if is_production_env(&self.base.environment)
            && self.base.cors_origins.iter().any(|o| o == "*")
        {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if let Some(base_url) = &self.asset_base_url {
            if !is_absolute_http_url(base_url) {
                return Err(anyhow::anyhow!(
                    "ASSET_BASE_URL must be an absolute http(s) URL"
                ));
            }
        }

        if self.migration_batch_size == 0 || self.migration_batch_size > MAX_MIGRATION_BATCH_SIZE {
            return Err(anyhow::anyhow!(
                "MIGRATION_BATCH_SIZE must be between 1 and {}",
                MAX_MIGRATION_BATCH_SIZE
            ));
        }

        for gateway in &self.ipfs_gateways {
            validate_gateway_url(gateway)
                .map_err(|e| anyhow::anyhow!("IPFS_GATEWAYS entry '{}': {}", gateway, e))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ArchiveConfig {
        ArchiveConfig {
            base: BaseConfig {
                server_port: 4000,
                cors_origins: vec!["*".to_string()],
                db_max_connections: 5,
                db_timeout_seconds: 10,
                environment: "development".to_string(),
            },
            database_url: "postgres://curio@localhost/curio".to_string(),
            asset_base_url: Some("https://assets.example.com".to_string()),
            migration_batch_size: 50,
            ipfs_gateways: DEFAULT_IPFS_GATEWAYS.iter().map(|g| g.to_string()).collect(),
        }
    }

    #[test]
    fn test_valid_sample() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let mut config = sample();
        config.base.environment = "Production".to_string();
        assert!(config.validate().is_err());

        config.base.cors_origins = vec!["https://archive.example.com".to_string()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = sample();
        config.database_url = "mysql://localhost".to_string();
        assert!(config.validate().is_err());

        let mut config = sample();
        config.asset_base_url = Some("assets".to_string());
        assert!(config.validate().is_err());

        let mut config = sample();
        config.migration_batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = sample();
        config.ipfs_gateways.push("ipfs://local".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_split_list_drops_blanks() {
        assert_eq!(
            split_list(" https://a/ , ,https://b/"),
            vec!["https://a/".to_string(), "https://b/".to_string()]
        );
    }
}
