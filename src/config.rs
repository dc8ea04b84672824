use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Engine configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// JSON file holding view definitions; in-memory when absent
    #[validate(length(min = 1, message = "View store path cannot be empty"))]
    pub view_store_path: Option<String>,

    /// Attempts per read-only store call (1-10)
    #[validate(range(min = 1, max = 10, message = "Store attempts must be between 1 and 10"))]
    pub store_max_attempts: u32,

    /// Pause between retried store calls, in milliseconds
    #[validate(range(
        max = 60000,
        message = "Store retry backoff must be at most 60000 ms"
    ))]
    pub store_retry_backoff_ms: u64,

    /// Whether to seed preset views for the requesting tenant on startup
    pub seed_on_startup: bool,

    /// Page size used when a caller gives none; 0 means unbounded
    #[validate(range(
        min = 0,
        max = 10000,
        message = "Default page limit must be between 0 and 10000"
    ))]
    pub default_page_limit: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            view_store_path: None,
            store_max_attempts: 3,
            store_retry_backoff_ms: 200,
            seed_on_startup: true,
            default_page_limit: 25,
        }
    }
}

impl EngineConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            view_store_path: env::var("VIEWGRAPH_VIEW_STORE").ok().filter(|p| !p.is_empty()),
            store_max_attempts: parse_env_var("VIEWGRAPH_STORE_MAX_ATTEMPTS", "3")?,
            store_retry_backoff_ms: parse_env_var("VIEWGRAPH_STORE_RETRY_BACKOFF_MS", "200")?,
            seed_on_startup: parse_env_var("VIEWGRAPH_SEED_ON_STARTUP", "true")?,
            default_page_limit: parse_env_var("VIEWGRAPH_DEFAULT_PAGE_LIMIT", "25")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from CLI arguments with validation
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            view_store_path: cli.view_store_path,
            store_max_attempts: cli.store_max_attempts.unwrap_or(defaults.store_max_attempts),
            store_retry_backoff_ms: cli
                .store_retry_backoff_ms
                .unwrap_or(defaults.store_retry_backoff_ms),
            seed_on_startup: !cli.no_seed,
            default_page_limit: cli.default_page_limit.unwrap_or(defaults.default_page_limit),
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Merge CLI flags over this configuration; only flags actually given win
    pub fn merge(&mut self, cli: &CliConfig) {
        if let Some(path) = &cli.view_store_path {
            self.view_store_path = Some(path.clone());
        }
        if let Some(attempts) = cli.store_max_attempts {
            self.store_max_attempts = attempts;
        }
        if let Some(backoff) = cli.store_retry_backoff_ms {
            self.store_retry_backoff_ms = backoff;
        }
        if cli.no_seed {
            self.seed_on_startup = false;
        }
        if let Some(limit) = cli.default_page_limit {
            self.default_page_limit = limit;
        }
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.store_retry_backoff_ms)
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub view_store_path: Option<String>,
    pub store_max_attempts: Option<u32>,
    pub store_retry_backoff_ms: Option<u64>,
    pub no_seed: bool,
    pub default_page_limit: Option<i64>,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
