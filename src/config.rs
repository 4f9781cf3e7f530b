//! Configuration loading and management.
//!
//! The default configuration file is `steampunk-scanner.toml` in the current
//! working directory. Use [`Config::load`] to read it, then
//! [`Config::apply_env`] to pick up the environment overrides:
//!
//! ```rust,no_run
//! use steampunk_scanner::config::Config;
//!
//! let mut config = Config::load(None).expect("failed to load config");
//! config.apply_env();
//! println!("scanning against {}", config.api.endpoint());
//! ```

use std::path::Path;

/// Service endpoint used when neither the config file nor the environment
/// name one.
pub const DEFAULT_ENDPOINT: &str = "https://scanner.steampunk.si/api";

/// Environment variable that overrides the configured endpoint.
pub const ENDPOINT_ENV: &str = "SCANNER_ENDPOINT";

const DEFAULT_CONFIG_FILE: &str = "steampunk-scanner.toml";

/// Main configuration.
///
/// All fields carry defaults so the config file can be omitted entirely.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    /// Where and how to reach the scanning service.
    pub api: ApiConfig,
}

/// Scanning service settings.
///
/// # Examples
///
/// ```toml
/// [api]
/// endpoint = "https://scanner.example.com/api"
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the service; request paths are appended to it.
    pub endpoint: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Endpoint taken from [`ENDPOINT_ENV`] at start-up. Never read from
    /// the file.
    #[serde(skip)]
    pub endpoint_override: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 10,
            endpoint_override: None,
        }
    }
}

impl ApiConfig {
    /// The endpoint requests go to: the override if set, else the
    /// configured one.
    ///
    /// # Examples
    ///
    /// ```
    /// use steampunk_scanner::config::{ApiConfig, DEFAULT_ENDPOINT};
    ///
    /// let mut api = ApiConfig::default();
    /// assert_eq!(api.endpoint(), DEFAULT_ENDPOINT);
    /// api.endpoint_override = Some("http://localhost:8080".into());
    /// assert_eq!(api.endpoint(), "http://localhost:8080");
    /// ```
    pub fn endpoint(&self) -> &str {
        self.endpoint_override.as_deref().unwrap_or(&self.endpoint)
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Resolution order:
    /// 1. If `path` is `Some`, load from that file (error if missing).
    /// 2. If `path` is `None`, try `steampunk-scanner.toml` in the current directory.
    /// 3. If that file does not exist either, return [`Config::default()`].
    ///
    /// # Errors
    ///
    /// Returns `Err(String)` when the explicit path does not exist, the file
    /// cannot be read, or the TOML content fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Config, String> {
        let config_path = if let Some(p) = path {
            if p.exists() {
                Some(p.to_path_buf())
            } else {
                return Err(format!("Config file not found: {}", p.display()));
            }
        } else {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                Some(default_path.to_path_buf())
            } else {
                None
            }
        };

        match config_path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
                let config: Config = toml::from_str(&content)
                    .map_err(|e| format!("Failed to parse config {}: {}", path.display(), e))?;
                tracing::debug!(path = %path.display(), "loaded config");
                Ok(config)
            }
            None => Ok(Config::default()),
        }
    }

    /// Reads [`ENDPOINT_ENV`] into [`ApiConfig::endpoint_override`].
    ///
    /// Meant to be called once, at process start.
    pub fn apply_env(&mut self) {
        self.api.endpoint_override = std::env::var(ENDPOINT_ENV)
            .ok()
            .filter(|endpoint| !endpoint.is_empty());
    }
}
