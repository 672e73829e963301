use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, error};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Environment (dev, staging, prod)
    #[serde(default = "default_environment")]
    pub environment: String,

    /// CORS allowed origins, comma separated. Any origin when unset.
    pub cors_origins: Option<String>,

    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Database URL for code block templates. In-memory templates when unset.
    pub db_url: Option<String>,

    /// Insert the starter code blocks into an empty database
    #[serde(default = "default_seed_code_blocks")]
    pub seed_code_blocks: bool,

    /// Seconds between ghost connection sweeps, 0 disables the sweep
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Idle time before a cached code block is evicted
    #[serde(default = "default_template_cache_ttl_secs")]
    pub template_cache_ttl_secs: u64,
}

impl Config {
    /// Load configuration from environment variables or app.env file
    pub fn load() -> Result<Self, ConfigError> {
        // Try to load from app.env file first
        if std::path::Path::new("app.env").exists() {
            dotenvy::from_filename("app.env").ok();
        } else {
            // Fallback to .env file
            dotenvy::dotenv().ok();
        }

        Self::from_env(std::env::vars())
    }

    /// Build the configuration from an explicit set of variables
    pub fn from_env<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        match envy::from_iter::<_, Config>(vars) {
            Ok(config) => {
                info!("✅ Configuration loaded successfully");
                Ok(config)
            }
            Err(e) => {
                error!("❌ Failed to load configuration: {}", e);
                Err(ConfigError::EnvError(e))
            }
        }
    }

    /// Get the full server address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode
    pub fn is_development(&self) -> bool {
        self.environment.to_lowercase() == "dev" || self.environment.to_lowercase() == "development"
    }

    /// Allowed CORS origins, `None` meaning any origin
    pub fn cors_origin_list(&self) -> Option<Vec<String>> {
        let origins = self.cors_origins.as_deref()?;
        let list: Vec<String> = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
        if list.is_empty() { None } else { Some(list) }
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }

    pub fn template_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.template_cache_ttl_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            cors_origins: None,
            service_name: default_service_name(),
            db_url: None,
            seed_code_blocks: default_seed_code_blocks(),
            sweep_interval_secs: default_sweep_interval_secs(),
            template_cache_ttl_secs: default_template_cache_ttl_secs(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    EnvError(envy::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EnvError(e) => write!(f, "Environment variable error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_service_name() -> String {
    "coderoom".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_seed_code_blocks() -> bool {
    true
}

fn default_sweep_interval_secs() -> u64 {
    30
}

fn default_template_cache_ttl_secs() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = Config::from_env(Vec::new()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server_address(), "0.0.0.0:5000");
        assert!(config.is_development());
        assert_eq!(config.sweep_interval(), Some(Duration::from_secs(30)));
        assert_eq!(config.cors_origin_list(), None);
    }

    #[test]
    fn test_reads_overrides() {
        let config = Config::from_env(vars(&[
            ("PORT", "8080"),
            ("ENVIRONMENT", "production"),
            ("DB_URL", "postgres://localhost/coderoom"),
            ("SEED_CODE_BLOCKS", "false"),
            ("SWEEP_INTERVAL_SECS", "0"),
            ("CORS_ORIGINS", "http://localhost:5173, https://coderoom.example ,"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert!(!config.is_development());
        assert_eq!(config.db_url.as_deref(), Some("postgres://localhost/coderoom"));
        assert!(!config.seed_code_blocks);
        assert_eq!(config.sweep_interval(), None);
        assert_eq!(
            config.cors_origin_list(),
            Some(vec!["http://localhost:5173".to_string(), "https://coderoom.example".to_string()])
        );
    }

    #[test]
    fn test_rejects_malformed_values() {
        assert!(Config::from_env(vars(&[("PORT", "not-a-port")])).is_err());
    }
}
