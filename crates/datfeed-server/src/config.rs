//! Configuration management

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use datfeed_ingest::upstream::client::{
    validate_base_url, DEFAULT_READ_TIMEOUT_SECS, DEFAULT_WRITE_TIMEOUT_SECS,
};
use datfeed_ingest::upstream::sink::{DEFAULT_FORWARD_CONCURRENCY, MAX_FORWARD_CONCURRENCY};
use datfeed_ingest::upstream::{ForwardStrategy, LedgerConfig, SinkOptions};

// ============================================================================
// Server Configuration Constants
// ============================================================================

/// Default server host binding.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 8000;

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default maximum upload body size (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default CORS allowed origin for local development.
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub forward: ForwardConfig,
    pub uploads: UploadConfig,
    pub cors: CorsConfig,
}

/// Server-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
}

/// Upstream sales ledger connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub url: String,
    pub read_timeout_secs: u64,
    pub write_timeout_secs: u64,
}

/// Forwarding strategy selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardConfig {
    pub strategy: ForwardStrategy,
    pub concurrency: usize,
    pub register_catalog: bool,
}

/// Upload limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub max_upload_bytes: usize,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from any variable source
    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(upstream_url) = var("UPSTREAM_URL") else {
            anyhow::bail!("UPSTREAM_URL must be set to the upstream sales ledger base URL");
        };

        let strategy = match var("FORWARD_STRATEGY") {
            Some(value) => value.parse::<ForwardStrategy>()?,
            None => ForwardStrategy::default(),
        };

        let config = Config {
            server: ServerConfig {
                host: var("DATFEED_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
                port: parse_var(&var, "DATFEED_PORT")?.unwrap_or(DEFAULT_SERVER_PORT),
                shutdown_timeout_secs: parse_var(&var, "DATFEED_SHUTDOWN_TIMEOUT")?
                    .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            },
            upstream: UpstreamConfig {
                url: upstream_url,
                read_timeout_secs: parse_var(&var, "UPSTREAM_READ_TIMEOUT_SECS")?
                    .unwrap_or(DEFAULT_READ_TIMEOUT_SECS),
                write_timeout_secs: parse_var(&var, "UPSTREAM_WRITE_TIMEOUT_SECS")?
                    .unwrap_or(DEFAULT_WRITE_TIMEOUT_SECS),
            },
            forward: ForwardConfig {
                strategy,
                concurrency: parse_var(&var, "FORWARD_CONCURRENCY")?
                    .unwrap_or(DEFAULT_FORWARD_CONCURRENCY),
                register_catalog: parse_var(&var, "FORWARD_REGISTER_CATALOG")?.unwrap_or(false),
            },
            uploads: UploadConfig {
                max_upload_bytes: parse_var(&var, "MAX_UPLOAD_BYTES")?
                    .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            },
            cors: CorsConfig {
                allowed_origins: var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|| DEFAULT_CORS_ALLOWED_ORIGIN.to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                allow_credentials: parse_var(&var, "CORS_ALLOW_CREDENTIALS")?.unwrap_or(true),
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        validate_base_url(&self.upstream.url)?;

        if self.upstream.read_timeout_secs == 0 || self.upstream.write_timeout_secs == 0 {
            anyhow::bail!("Upstream timeouts must be greater than 0");
        }

        if !(1..=MAX_FORWARD_CONCURRENCY).contains(&self.forward.concurrency) {
            anyhow::bail!(
                "FORWARD_CONCURRENCY must be between 1 and {} (got {})",
                MAX_FORWARD_CONCURRENCY,
                self.forward.concurrency
            );
        }

        if self.forward.register_catalog && self.forward.strategy == ForwardStrategy::Batch {
            tracing::warn!("FORWARD_REGISTER_CATALOG only applies to the per-record strategy");
        }

        if self.uploads.max_upload_bytes == 0 {
            anyhow::bail!("MAX_UPLOAD_BYTES must be greater than 0");
        }

        if self.cors.allowed_origins.is_empty() {
            tracing::warn!("No CORS origins configured - all origins will be allowed");
        }

        Ok(())
    }

    /// Ledger client settings
    pub fn ledger(&self) -> LedgerConfig {
        LedgerConfig::new(self.upstream.url.clone())
            .with_read_timeout(Duration::from_secs(self.upstream.read_timeout_secs))
            .with_write_timeout(Duration::from_secs(self.upstream.write_timeout_secs))
    }

    /// Forwarding sink settings
    pub fn sink_options(&self) -> SinkOptions {
        SinkOptions {
            strategy: self.forward.strategy,
            concurrency: self.forward.concurrency,
            register_catalog: self.forward.register_catalog,
        }
    }
}

/// `None` when unset; a set but unparseable value is an error
fn parse_var<T, F>(var: &F, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = var(key) else {
        return Ok(None);
    };
    match raw.trim().parse() {
        Ok(value) => Ok(Some(value)),
        Err(_) => anyhow::bail!("{} has an invalid value '{}'", key, raw),
    }
}
