//! Configuration management infrastructure.
//!
//! Client settings live in a TOML file (by default
//! `<config dir>/mss-client/config.toml`) and are turned into an
//! [`MssClientConfig`] once validated.

use crate::adapters::mss::client::MssClientConfig;
use crate::domain::constants::{DEFAULT_AP_PASSWORD, DEFAULT_TIMEOUT_SECS};
use crate::domain::types::{ServiceUrl, SignatureProfile};
use crate::infra::error::{MssError, MssResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Persistent client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfiguration {
    /// Primary REST endpoint
    pub rest_url: String,

    /// Endpoint tried once when the primary is unreachable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_rest_url: Option<String>,

    /// Application Provider identifier (`AP_ID`)
    pub ap_id: String,

    /// `AP_PWD` value stamped on requests
    #[serde(default = "default_ap_password")]
    pub ap_password: String,

    /// Connect and read timeout per attempt
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Whether to verify TLS certificates
    #[serde(default = "default_true")]
    pub verify_tls: bool,

    /// Profile used when a command does not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_signature_profile: Option<String>,

    /// Message shown on the phone when a command does not give one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Request authentication
    pub auth: AuthConfig,
}

/// Authentication section, tagged by `mode`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum AuthConfig {
    /// HMAC with an API key; `AP_ID` is the key owner.
    ApiKey {
        #[serde(default)]
        api_key: String,
    },
    /// HTTP Basic with an AP name and password.
    Password {
        ap_name: String,
        #[serde(default)]
        password: String,
    },
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey { .. } => f.debug_struct("ApiKey").finish_non_exhaustive(),
            Self::Password { ap_name, .. } => f
                .debug_struct("Password")
                .field("ap_name", ap_name)
                .finish_non_exhaustive(),
        }
    }
}

fn default_ap_password() -> String {
    DEFAULT_AP_PASSWORD.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

impl Default for ClientConfiguration {
    fn default() -> Self {
        Self {
            rest_url: "https://mss.example.com/rest/service".to_string(),
            secondary_rest_url: None,
            ap_id: "http://ap.example.com".to_string(),
            ap_password: default_ap_password(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            verify_tls: true,
            default_signature_profile: Some(SignatureProfile::signing().as_uri().to_string()),
            message: None,
            auth: AuthConfig::ApiKey {
                api_key: String::new(),
            },
        }
    }
}

impl ClientConfiguration {
    /// Replace secrets with values from the environment, if set.
    #[must_use]
    pub fn with_secret_overrides(mut self, api_key: Option<String>, password: Option<String>) -> Self {
        match &mut self.auth {
            AuthConfig::ApiKey { api_key: key } => {
                if let Some(value) = api_key {
                    *key = value;
                }
            }
            AuthConfig::Password {
                password: pw, ..
            } => {
                if let Some(value) = password {
                    *pw = value;
                }
            }
        }
        self
    }

    /// Signature profile to use when none is given explicitly.
    #[must_use]
    pub fn signature_profile(&self) -> SignatureProfile {
        self.default_signature_profile
            .as_deref()
            .map_or_else(SignatureProfile::signing, SignatureProfile::new)
    }

    /// Build the runtime client configuration.
    ///
    /// # Errors
    /// `WrongParameter` for a malformed URL, `MissingParameter` for a
    /// missing secret.
    pub fn to_client_config(&self) -> MssResult<MssClientConfig> {
        let mut config = MssClientConfig::new(ServiceUrl::new(&self.rest_url)?, self.ap_id.clone())
            .with_ap_password(self.ap_password.clone())
            .with_timeout(Duration::from_secs(self.timeout_seconds));
        if let Some(secondary) = &self.secondary_rest_url {
            config = config.with_secondary_url(ServiceUrl::new(secondary)?);
        }
        if !self.verify_tls {
            config = config.with_insecure_tls();
        }
        config = match &self.auth {
            AuthConfig::ApiKey { api_key } => {
                if api_key.is_empty() {
                    return Err(MssError::missing_parameter(
                        "API key is not configured (set auth.api_key or MSS_API_KEY)",
                    ));
                }
                config.with_api_key(api_key.clone())
            }
            AuthConfig::Password { ap_name, password } => {
                if password.is_empty() {
                    return Err(MssError::missing_parameter(
                        "Password is not configured (set auth.password or MSS_PASSWORD)",
                    ));
                }
                config.with_password(ap_name.clone(), password.clone())
            }
        };
        Ok(config)
    }
}

/// Configuration manager for handling config files
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new configuration manager with default path
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a configuration manager with custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("mss-client").join("config.toml")
        } else {
            PathBuf::from("mss-client-config.toml")
        }
    }

    /// Load configuration from file, creating default if it doesn't exist
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or written.
    pub fn load_or_create_default(&self) -> MssResult<ClientConfiguration> {
        if self.config_path.exists() {
            self.load()
        } else {
            log::info!(
                "Configuration file not found, creating default: {}",
                self.config_path.display()
            );
            let default_config = ClientConfiguration::default();
            self.save(&default_config)?;
            Ok(default_config)
        }
    }

    /// Load configuration from file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(&self) -> MssResult<ClientConfiguration> {
        log::info!("Loading configuration from: {}", self.config_path.display());

        let content = fs::read_to_string(&self.config_path).map_err(|e| {
            MssError::internal(format!(
                "Failed to read config file {}: {e}",
                self.config_path.display()
            ))
        })?;

        let config: ClientConfiguration = toml::from_str(&content)?;
        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Save configuration to file
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, config: &ClientConfiguration) -> MssResult<()> {
        log::info!("Saving configuration to: {}", self.config_path.display());

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                MssError::internal(format!(
                    "Failed to create config directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).map_err(|e| {
            MssError::internal(format!(
                "Failed to write config file {}: {e}",
                self.config_path.display()
            ))
        })?;

        log::info!("Configuration saved successfully");
        Ok(())
    }

    /// Validate configuration values. Secrets are not required here since
    /// they may come from the environment.
    fn validate_config(config: &ClientConfiguration) -> MssResult<()> {
        ServiceUrl::new(&config.rest_url)?;
        if let Some(secondary) = &config.secondary_rest_url {
            ServiceUrl::new(secondary)?;
        }

        if config.ap_id.trim().is_empty() {
            return Err(MssError::missing_parameter("ap_id must not be empty"));
        }

        if config.timeout_seconds == 0 {
            return Err(MssError::wrong_parameter(
                "timeout_seconds must be greater than 0",
            ));
        }

        if let AuthConfig::Password { ap_name, .. } = &config.auth {
            if ap_name.trim().is_empty() {
                return Err(MssError::missing_parameter("auth.ap_name must not be empty"));
            }
        }

        Ok(())
    }

    /// Get the configuration file path
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
