//! Connector configuration
//!
//! [`ConnectorConfig`] is the validated, immutable value a connector is
//! built with. [`ConnectorSettings`] is its serializable twin, loaded from
//! YAML or JSON files.

use crate::auth::{AuthConfig, SharedAuth};
use crate::error::{Error, Result};
use crate::http::RequestOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default number of documents requested per page
pub const DEFAULT_ITEMS_PER_REQUEST: u32 = 50;

/// Default number of retries on transient failures
pub const DEFAULT_MAX_RETRIES: u32 = 5;

// ============================================================================
// Runtime Config
// ============================================================================

/// Immutable connector configuration
#[derive(Clone)]
pub struct ConnectorConfig {
    api_uri: String,
    auth: Option<SharedAuth>,
    items_per_request: u32,
    check_ca: bool,
    max_retries: u32,
    retry_timeout_factor: f64,
    user_agent: Option<String>,
}

impl ConnectorConfig {
    /// Config with every default, for the given API root
    pub fn new(api_uri: impl Into<String>) -> Result<Self> {
        Self::builder(api_uri).build()
    }

    /// Create a new config builder
    pub fn builder(api_uri: impl Into<String>) -> ConnectorConfigBuilder {
        ConnectorConfigBuilder {
            config: Self {
                api_uri: api_uri.into(),
                auth: None,
                items_per_request: DEFAULT_ITEMS_PER_REQUEST,
                check_ca: false,
                max_retries: DEFAULT_MAX_RETRIES,
                retry_timeout_factor: 0.0,
                user_agent: None,
            },
        }
    }

    /// Full path to the API, e.g. `http://manager.scielo.org/api/v1/`
    pub fn api_uri(&self) -> &str {
        &self.api_uri
    }

    /// Auth hook applied to every request
    pub fn auth(&self) -> Option<&SharedAuth> {
        self.auth.as_ref()
    }

    /// Documents requested per page
    pub fn items_per_request(&self) -> u32 {
        self.items_per_request
    }

    /// Verify certificates on https URLs
    pub fn check_ca(&self) -> bool {
        self.check_ca
    }

    /// Retries allowed on transient failures within one fetch
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Seconds of backoff per retry already made
    pub fn retry_timeout_factor(&self) -> f64 {
        self.retry_timeout_factor
    }

    /// User agent override
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Wait before the retry that follows `attempt` (0-based).
    ///
    /// Linear: `attempt * retry_timeout_factor` seconds, so attempt 0 never
    /// waits.
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::try_from_secs_f64(f64::from(attempt) * self.retry_timeout_factor)
            .unwrap_or(Duration::MAX)
    }

    /// Broker options derived from this config
    pub fn request_options(&self) -> RequestOptions {
        RequestOptions {
            auth: self.auth.clone(),
            check_ca: self.check_ca,
            user_agent: self.user_agent.clone(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.api_uri.trim().is_empty() {
            return Err(Error::invalid_value("api_uri", "must not be empty"));
        }
        if self.items_per_request == 0 {
            return Err(Error::invalid_value(
                "items_per_request",
                "must be a positive integer",
            ));
        }
        if !self.retry_timeout_factor.is_finite() || self.retry_timeout_factor < 0.0 {
            return Err(Error::invalid_value(
                "retry_timeout_factor",
                format!(
                    "must be a non-negative number, got {}",
                    self.retry_timeout_factor
                ),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for ConnectorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorConfig")
            .field("api_uri", &self.api_uri)
            .field("has_auth", &self.auth.is_some())
            .field("items_per_request", &self.items_per_request)
            .field("check_ca", &self.check_ca)
            .field("max_retries", &self.max_retries)
            .field("retry_timeout_factor", &self.retry_timeout_factor)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Builder for connector config
pub struct ConnectorConfigBuilder {
    config: ConnectorConfig,
}

impl ConnectorConfigBuilder {
    /// Set the auth hook
    #[must_use]
    pub fn auth(mut self, auth: SharedAuth) -> Self {
        self.config.auth = Some(auth);
        self
    }

    /// Set documents per page
    #[must_use]
    pub fn items_per_request(mut self, items: u32) -> Self {
        self.config.items_per_request = items;
        self
    }

    /// Set certificate verification
    #[must_use]
    pub fn check_ca(mut self, check_ca: bool) -> Self {
        self.config.check_ca = check_ca;
        self
    }

    /// Set max retries
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set the backoff factor, in seconds
    #[must_use]
    pub fn retry_timeout_factor(mut self, factor: f64) -> Self {
        self.config.retry_timeout_factor = factor;
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(agent.into());
        self
    }

    /// Validate and build the config
    pub fn build(self) -> Result<ConnectorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// ============================================================================
// File Settings
// ============================================================================

/// Connector settings as written in a YAML or JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorSettings {
    /// Full path to the API
    pub api_uri: String,

    /// Authentication
    #[serde(default)]
    pub auth: Option<AuthConfig>,

    /// Documents requested per page
    #[serde(default = "default_items_per_request")]
    pub items_per_request: u32,

    /// Verify certificates on https URLs
    #[serde(default)]
    pub check_ca: bool,

    /// Retries on transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff factor in seconds
    #[serde(default)]
    pub retry_timeout_factor: f64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_items_per_request() -> u32 {
    DEFAULT_ITEMS_PER_REQUEST
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

impl ConnectorSettings {
    /// Settings with defaults for the given API root
    pub fn new(api_uri: impl Into<String>) -> Self {
        Self {
            api_uri: api_uri.into(),
            auth: None,
            items_per_request: DEFAULT_ITEMS_PER_REQUEST,
            check_ca: false,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_timeout_factor: 0.0,
            user_agent: None,
        }
    }

    /// Parse settings from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse settings from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a file; `.json` files are JSON, anything else YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Validate and turn into a runtime config
    pub fn into_config(self) -> Result<ConnectorConfig> {
        let mut builder = ConnectorConfig::builder(self.api_uri)
            .items_per_request(self.items_per_request)
            .check_ca(self.check_ca)
            .max_retries(self.max_retries)
            .retry_timeout_factor(self.retry_timeout_factor);

        if let Some(auth) = self.auth {
            builder = builder.auth(auth.into_hook());
        }
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ApiKeyAuth;
    use std::io::Write;
    use std::sync::Arc;

    #[test]
    fn test_basic_init_state() {
        let config = ConnectorConfig::new("http://api.foo.com/api/v1/").unwrap();
        assert_eq!(config.api_uri(), "http://api.foo.com/api/v1/");
        assert!(config.auth().is_none());
        assert_eq!(config.items_per_request(), 50);
        assert!(!config.check_ca());
        assert_eq!(config.max_retries(), 5);
        assert_eq!(config.retry_timeout_factor(), 0.0);
        assert!(config.user_agent().is_none());
    }

    #[test]
    fn test_builder() {
        let config = ConnectorConfig::builder("https://manager.scielo.org/api/v1/")
            .auth(Arc::new(ApiKeyAuth::new("alice", "key")))
            .items_per_request(10)
            .check_ca(true)
            .max_retries(2)
            .retry_timeout_factor(0.5)
            .user_agent("scielo.forest")
            .build()
            .unwrap();

        assert!(config.auth().is_some());
        assert_eq!(config.items_per_request(), 10);
        assert!(config.check_ca());
        assert_eq!(config.max_retries(), 2);
        assert_eq!(config.retry_timeout_factor(), 0.5);

        let options = config.request_options();
        assert!(options.auth.is_some());
        assert!(options.check_ca);
        assert_eq!(options.effective_user_agent(), "scielo.forest");
    }

    #[test]
    fn test_backoff_is_linear() {
        let config = ConnectorConfig::builder("api.foo.com")
            .retry_timeout_factor(0.5)
            .build()
            .unwrap();

        assert_eq!(config.backoff(0), Duration::ZERO);
        assert_eq!(config.backoff(1), Duration::from_millis(500));
        assert_eq!(config.backoff(4), Duration::from_secs(2));

        let config = ConnectorConfig::new("api.foo.com").unwrap();
        assert_eq!(config.backoff(3), Duration::ZERO);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            ConnectorConfig::new("  "),
            Err(Error::InvalidConfigValue { field, .. }) if field == "api_uri"
        ));
        assert!(matches!(
            ConnectorConfig::builder("x").items_per_request(0).build(),
            Err(Error::InvalidConfigValue { field, .. }) if field == "items_per_request"
        ));
        for factor in [-0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                ConnectorConfig::builder("x").retry_timeout_factor(factor).build(),
                Err(Error::InvalidConfigValue { field, .. }) if field == "retry_timeout_factor"
            ));
        }
    }

    #[test]
    fn test_debug_hides_auth() {
        let config = ConnectorConfig::builder("x")
            .auth(Arc::new(ApiKeyAuth::new("alice", "s3cr3t")))
            .build()
            .unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("has_auth: true"));
        assert!(!debug.contains("s3cr3t"));
    }

    #[test]
    fn test_settings_defaults_from_yaml() {
        let settings = ConnectorSettings::from_yaml_str("api_uri: http://api.foo.com/api/v1/\n")
            .unwrap();
        assert_eq!(settings, ConnectorSettings::new("http://api.foo.com/api/v1/"));

        let config = settings.into_config().unwrap();
        assert_eq!(config.items_per_request(), 50);
        assert_eq!(config.max_retries(), 5);
    }

    #[test]
    fn test_settings_full_yaml() {
        let yaml = r"
api_uri: https://manager.scielo.org/api/v1/
auth:
  type: api_key
  username: alice
  api_key: s3cr3t
items_per_request: 20
check_ca: true
max_retries: 3
retry_timeout_factor: 1.5
user_agent: scielo.forest
";
        let config = ConnectorSettings::from_yaml_str(yaml)
            .unwrap()
            .into_config()
            .unwrap();

        assert!(config.auth().is_some());
        assert_eq!(config.items_per_request(), 20);
        assert!(config.check_ca());
        assert_eq!(config.max_retries(), 3);
        assert_eq!(config.retry_timeout_factor(), 1.5);
        assert_eq!(config.user_agent(), Some("scielo.forest"));
    }

    #[test]
    fn test_settings_reject_invalid_values() {
        let settings =
            ConnectorSettings::from_json_str(r#"{"api_uri": "x", "retry_timeout_factor": -1}"#)
                .unwrap();
        assert!(settings.into_config().is_err());

        assert!(ConnectorSettings::from_json_str(r#"{"max_retries": 1}"#).is_err());
    }

    #[test]
    fn test_settings_from_file() {
        let mut yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(yaml, "api_uri: api.foo.com\nmax_retries: 1").unwrap();
        let settings = ConnectorSettings::from_file(yaml.path()).unwrap();
        assert_eq!(settings.max_retries, 1);

        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"{{"api_uri": "api.foo.com", "items_per_request": 7}}"#).unwrap();
        let settings = ConnectorSettings::from_file(json.path()).unwrap();
        assert_eq!(settings.items_per_request, 7);

        assert!(matches!(
            ConnectorSettings::from_file("/nonexistent/forest.yaml"),
            Err(Error::Io(_))
        ));
    }
}
