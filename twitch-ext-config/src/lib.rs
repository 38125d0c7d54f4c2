//! # Twitch Extension Config
//!
//! Configuration for the Twitch extension SDK: the extension owner, its
//! client id and secret, and the extension/configuration versions used by the
//! extension API endpoints.
//!
//! A configuration can be built in code, through [`ExtensionConfigBuilder`],
//! or loaded from JSON/TOML files and environment variables.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Base address of the public extension API
pub const DEFAULT_API_BASE_URL: &str = "https://api.twitch.tv";

/// Errors that can occur when working with extension configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Owner id is required but was not provided. Please specify the user id of the extension owner.")]
    MissingOwnerId,

    #[error("Client id is required but was not provided. Please specify the extension client id.")]
    MissingClientId,

    #[error("Extension secret is required but was not provided. Please provide the base64 secret from the extension console.")]
    MissingSecret,

    #[error("API base URL must not be empty.")]
    MissingApiBaseUrl,

    #[error("I/O error occurred while reading configuration: {0}. Please check file permissions and paths.")]
    IOError(String),

    #[error("Failed to parse configuration data: {0}. Please ensure the configuration format is correct.")]
    ParseError(String),

    #[error("Environment variable error: {0}. Please ensure all required environment variables are set correctly.")]
    EnvVarError(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        ConfigError::IOError(error.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::ParseError(error.to_string())
    }
}

#[cfg(feature = "toml")]
impl From<toml::de::Error> for ConfigError {
    fn from(error: toml::de::Error) -> Self {
        ConfigError::ParseError(error.to_string())
    }
}

/// Configuration of an extension API client
///
/// # Examples
///
/// ```
/// use twitch_ext_config::ExtensionConfig;
///
/// let config = ExtensionConfig::new(
///     "owner-id",   // user id of the extension owner
///     "client-id",  // extension client id
///     "c2VjcmV0",   // base64 extension secret
///     "0.0.1",      // extension version
///     "1",          // configuration version
/// );
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct ExtensionConfig {
    pub owner_id: String,
    pub client_id: String,
    /// Base64 encoded extension secret
    pub secret: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub config_version: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

impl fmt::Debug for ExtensionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionConfig")
            .field("owner_id", &self.owner_id)
            .field("client_id", &self.client_id)
            .field("secret", &"[REDACTED]")
            .field("version", &self.version)
            .field("config_version", &self.config_version)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl ExtensionConfig {
    /// Create a new configuration against the public extension API
    pub fn new(
        owner_id: impl Into<String>,
        client_id: impl Into<String>,
        secret: impl Into<String>,
        version: impl Into<String>,
        config_version: impl Into<String>,
    ) -> Self {
        ExtensionConfig {
            owner_id: owner_id.into(),
            client_id: client_id.into(),
            secret: secret.into(),
            version: version.into(),
            config_version: config_version.into(),
            api_base_url: default_api_base_url(),
        }
    }

    pub fn builder() -> ExtensionConfigBuilder {
        ExtensionConfigBuilder::new()
    }

    /// Convert this configuration to a builder for modification
    pub fn to_builder(&self) -> ExtensionConfigBuilder {
        ExtensionConfigBuilder::from_config(self)
    }

    /// API base URL without a trailing slash
    pub fn api_base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    /// Create a configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file_content = fs::read_to_string(path)?;
        let config: ExtensionConfig = serde_json::from_str(&file_content)?;
        config.validate()?;
        Ok(config)
    }

    /// Create a configuration from a TOML file
    #[cfg(feature = "toml")]
    pub fn from_toml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file_content = fs::read_to_string(path)?;
        let config: ExtensionConfig = toml::from_str(&file_content)?;
        config.validate()?;
        Ok(config)
    }

    /// Create a configuration from environment variables
    ///
    /// The environment variables should be named with the given prefix followed by:
    /// - OWNER_ID: The user id of the extension owner
    /// - CLIENT_ID: The extension client id
    /// - SECRET: The base64 extension secret
    /// - VERSION: The extension version (optional)
    /// - CONFIG_VERSION: The configuration service version (optional)
    /// - API_BASE_URL: Override of the API address (optional)
    ///
    /// For example, with the prefix "TWITCH_EXT" the owner id is read from
    /// `TWITCH_EXT_OWNER_ID`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if any required variable is missing or the
    /// resulting configuration is invalid.
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let secret = required_var(prefix, "SECRET")?;
        Self::from_env_with_secret(prefix, secret)
    }

    /// Create a configuration from environment variables or files
    ///
    /// Same as [`from_env`](Self::from_env), except that the secret may also be
    /// read from the file named by `{PREFIX}_SECRET_FILE`, which takes
    /// precedence over `{PREFIX}_SECRET`.
    pub fn from_env_or_file(prefix: &str) -> Result<Self, ConfigError> {
        let secret = match optional_var(prefix, "SECRET_FILE")? {
            Some(secret_file) => fs::read_to_string(secret_file)
                .map_err(|e| ConfigError::IOError(format!("Failed to read secret file: {}", e)))?
                .trim()
                .to_string(),
            None => required_var(prefix, "SECRET")?,
        };
        Self::from_env_with_secret(prefix, secret)
    }

    fn from_env_with_secret(prefix: &str, secret: String) -> Result<Self, ConfigError> {
        let config = ExtensionConfig {
            owner_id: required_var(prefix, "OWNER_ID")?,
            client_id: required_var(prefix, "CLIENT_ID")?,
            secret,
            version: optional_var(prefix, "VERSION")?.unwrap_or_default(),
            config_version: optional_var(prefix, "CONFIG_VERSION")?.unwrap_or_default(),
            api_base_url: optional_var(prefix, "API_BASE_URL")?
                .unwrap_or_else(default_api_base_url),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Only checks presence; the secret encoding is checked when a token is signed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.owner_id.is_empty() {
            return Err(ConfigError::MissingOwnerId);
        }
        if self.client_id.is_empty() {
            return Err(ConfigError::MissingClientId);
        }
        if self.secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if self.api_base_url.is_empty() {
            return Err(ConfigError::MissingApiBaseUrl);
        }
        Ok(())
    }
}

fn required_var(prefix: &str, name: &str) -> Result<String, ConfigError> {
    let key = format!("{}_{}", prefix, name);
    env::var(&key).map_err(|e| ConfigError::EnvVarError(format!("{}: {}", key, e)))
}

fn optional_var(prefix: &str, name: &str) -> Result<Option<String>, ConfigError> {
    let key = format!("{}_{}", prefix, name);
    match env::var(&key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::EnvVarError(format!("{}: {}", key, e))),
    }
}

/// Builder for ExtensionConfig
///
/// ```
/// # fn main() -> Result<(), twitch_ext_config::ConfigError> {
/// use twitch_ext_config::ExtensionConfigBuilder;
///
/// let config = ExtensionConfigBuilder::new()
///     .owner_id("owner-id")
///     .client_id("client-id")
///     .secret("c2VjcmV0")
///     .version("0.0.1")
///     .config_version("1")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug)]
pub struct ExtensionConfigBuilder {
    owner_id: Option<String>,
    client_id: Option<String>,
    secret: Option<String>,
    version: Option<String>,
    config_version: Option<String>,
    api_base_url: Option<String>,
}

impl ExtensionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new builder from an existing ExtensionConfig
    pub fn from_config(config: &ExtensionConfig) -> Self {
        Self {
            owner_id: Some(config.owner_id.clone()),
            client_id: Some(config.client_id.clone()),
            secret: Some(config.secret.clone()),
            version: Some(config.version.clone()),
            config_version: Some(config.config_version.clone()),
            api_base_url: Some(config.api_base_url.clone()),
        }
    }

    /// Set the user id of the extension owner
    pub fn owner_id(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    /// Set the extension client id
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set the base64 extension secret
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Set the extension version
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the configuration service version
    pub fn config_version(mut self, config_version: impl Into<String>) -> Self {
        self.config_version = Some(config_version.into());
        self
    }

    /// Override the API address, e.g. to point at a mock server
    pub fn api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = Some(api_base_url.into());
        self
    }

    /// Build the ExtensionConfig
    ///
    /// # Errors
    ///
    /// Returns an error if any required field is missing or invalid
    pub fn build(self) -> Result<ExtensionConfig, ConfigError> {
        let config = ExtensionConfig {
            owner_id: self.owner_id.ok_or(ConfigError::MissingOwnerId)?,
            client_id: self.client_id.ok_or(ConfigError::MissingClientId)?,
            secret: self.secret.ok_or(ConfigError::MissingSecret)?,
            version: self.version.unwrap_or_default(),
            config_version: self.config_version.unwrap_or_default(),
            api_base_url: self.api_base_url.unwrap_or_else(default_api_base_url),
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ExtensionConfig {
        ExtensionConfig::new("owner", "client", "c2VjcmV0", "0.0.1", "1")
    }

    #[test]
    fn test_config_new() {
        let config = valid_config();
        assert_eq!(config.owner_id, "owner");
        assert_eq!(config.client_id, "client");
        assert_eq!(config.secret, "c2VjcmV0");
        assert_eq!(config.version, "0.0.1");
        assert_eq!(config.config_version, "1");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = valid_config();
        config.owner_id.clear();
        assert!(matches!(config.validate(), Err(ConfigError::MissingOwnerId)));

        let mut config = valid_config();
        config.client_id.clear();
        assert!(matches!(config.validate(), Err(ConfigError::MissingClientId)));

        let mut config = valid_config();
        config.secret.clear();
        assert!(matches!(config.validate(), Err(ConfigError::MissingSecret)));

        let mut config = valid_config();
        config.api_base_url.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingApiBaseUrl)
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", valid_config());
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("c2VjcmV0"));
    }

    #[test]
    fn test_api_base_trims_trailing_slash() {
        let config = valid_config()
            .to_builder()
            .api_base_url("http://127.0.0.1:8080/")
            .build()
            .unwrap();
        assert_eq!(config.api_base(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_builder() {
        let config = ExtensionConfig::builder()
            .owner_id("owner")
            .client_id("client")
            .secret("c2VjcmV0")
            .build()
            .unwrap();
        assert_eq!(config.version, "");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);

        let result = ExtensionConfig::builder()
            .owner_id("owner")
            .secret("c2VjcmV0")
            .build();
        assert!(matches!(result, Err(ConfigError::MissingClientId)));
    }

    #[test]
    fn test_config_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("config.json");
        fs::write(
            &file_path,
            r#"{
                "owner_id": "json-owner",
                "client_id": "json-client",
                "secret": "c2VjcmV0",
                "version": "0.0.2",
                "config_version": "3"
            }"#,
        )
        .unwrap();

        let config = ExtensionConfig::from_file(&file_path).unwrap();
        assert_eq!(config.owner_id, "json-owner");
        assert_eq!(config.client_id, "json-client");
        assert_eq!(config.config_version, "3");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);

        let missing = ExtensionConfig::from_file(temp_dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ConfigError::IOError(_))));

        fs::write(&file_path, "{ not json").unwrap();
        assert!(matches!(
            ExtensionConfig::from_file(&file_path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_config_from_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("config.toml");
        fs::write(
            &file_path,
            r#"
                owner_id = "toml-owner"
                client_id = "toml-client"
                secret = "c2VjcmV0"
                version = "0.0.1"
                config_version = "1"
                api_base_url = "http://localhost:9000"
            "#,
        )
        .unwrap();

        let config = ExtensionConfig::from_toml(&file_path).unwrap();
        assert_eq!(config.owner_id, "toml-owner");
        assert_eq!(config.api_base_url, "http://localhost:9000");
    }

    #[test]
    fn test_config_from_env() {
        env::set_var("CFG_ENV_TEST_OWNER_ID", "env-owner");
        env::set_var("CFG_ENV_TEST_CLIENT_ID", "env-client");
        env::set_var("CFG_ENV_TEST_SECRET", "c2VjcmV0");
        env::set_var("CFG_ENV_TEST_VERSION", "0.0.9");

        let config = ExtensionConfig::from_env("CFG_ENV_TEST").unwrap();
        assert_eq!(config.owner_id, "env-owner");
        assert_eq!(config.client_id, "env-client");
        assert_eq!(config.version, "0.0.9");
        assert_eq!(config.config_version, "");

        let missing = ExtensionConfig::from_env("CFG_ENV_MISSING");
        assert!(matches!(missing, Err(ConfigError::EnvVarError(_))));
    }

    #[test]
    fn test_config_from_env_or_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let secret_path = temp_dir.path().join("secret");
        fs::write(&secret_path, "ZmlsZS1zZWNyZXQ=\n").unwrap();

        env::set_var("CFG_FILE_TEST_OWNER_ID", "file-owner");
        env::set_var("CFG_FILE_TEST_CLIENT_ID", "file-client");
        env::set_var("CFG_FILE_TEST_SECRET", "ignored");
        env::set_var("CFG_FILE_TEST_SECRET_FILE", &secret_path);

        let config = ExtensionConfig::from_env_or_file("CFG_FILE_TEST").unwrap();
        assert_eq!(config.secret, "ZmlsZS1zZWNyZXQ=");
    }
}
