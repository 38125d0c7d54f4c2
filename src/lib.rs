//! # Twitch Extension SDK
//!
//! A Rust client library for the Twitch extension API.
//!
//! The SDK signs short lived extension JWTs with the extension secret, calls
//! the extension endpoints with them and verifies tokens sent by an
//! extension's frontend.
//!
//! ## Features
//!
//! - **Token handling**: HS256 signing and verification with an explicit
//!   algorithm allow-list
//! - **Flexible configuration**: Load configuration from environment
//!   variables, JSON or TOML files
//! - **Endpoint coverage**: configuration service, extension chat, pub/sub
//!   messages, secret management and live channel listing
//! - **Rate limit reporting**: every response exposes the platform's rate
//!   limit counters
//!
//! ## Feature Flags
//!
//! - `toml`: Enables configuration loading from TOML files (on by default)
//!
//! ## Basic Usage
//!
//! ```no_run
//! use twitch_ext::{ExtensionClient, ExtensionConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExtensionConfig::builder()
//!     .owner_id("12345")
//!     .client_id("my-client-id")
//!     .secret("c2VjcmV0")
//!     .version("0.0.1")
//!     .config_version("1")
//!     .build()?;
//! let client = ExtensionClient::new(config)?;
//!
//! client
//!     .publish_channel_notification("67890", &serde_json::json!({"score": 3}))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! When using `from_env()` or `from_env_or_file()`, the following variables are expected:
//!
//! ```text
//! ${PREFIX}_OWNER_ID        - User id of the extension owner
//! ${PREFIX}_CLIENT_ID       - Extension client id
//! ${PREFIX}_SECRET          - Base64 extension secret
//! ${PREFIX}_SECRET_FILE     - Path to a file holding the secret (from_env_or_file only)
//! ${PREFIX}_VERSION         - Optional extension version
//! ${PREFIX}_CONFIG_VERSION  - Optional configuration service version
//! ${PREFIX}_API_BASE_URL    - Optional API address
//! ```
//!
//! [`try_load_default_config`] uses the `TWITCH_EXT` prefix before falling
//! back to configuration files. Nothing is cached between calls: every client
//! owns the configuration, and the secret, it was built with.
//!
//! ## Claims
//!
//! Request claims are always issued for the configured extension owner through
//! [`ExtensionClient::create_claims`]; the facade offers no way to pick another
//! subject.
//!
//! ```compile_fail
//! use twitch_ext::create_claims;
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

pub use twitch_ext_api::{
    AllConfigurationsResponse, ApiError, Channel, Configuration, ConfigurationResponse,
    ExtensionClient, ExtensionClientBuilder, ExtensionEnabledChannels, Method, Record,
    ResponseCommon, Secret, SecretsResponse, Segment, SegmentType, MAX_CHAT_MESSAGE_LENGTH,
};
pub use twitch_ext_config::{
    ConfigError, ExtensionConfig, ExtensionConfigBuilder, DEFAULT_API_BASE_URL,
};
pub use twitch_ext_token::{
    decode_secret, encode_secret, sign_claims, verify_token, verify_token_at, ExtensionClaims,
    Permissions, PublishTarget, Role, TokenError, ALL_CHANNELS, CLAIMS_LIFETIME_MILLIS,
};

/// Environment prefix read by [`try_load_default_config`]
pub const DEFAULT_ENV_PREFIX: &str = "TWITCH_EXT";

/// Errors that can occur in the SDK
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// API error
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Token error
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// Generic error
    #[error("{0}")]
    Generic(String),
}

/// Try to load a configuration from standard locations.
///
/// In order:
/// 1. Environment variables with the prefix `TWITCH_EXT`
/// 2. `./twitch-ext.json`
/// 3. `~/.twitch-ext/config.json`
/// 4. With the `toml` feature, `./twitch-ext.toml` and `~/.twitch-ext/config.toml`
///
/// Returns None if no configuration could be found.
///
/// ```no_run
/// use twitch_ext::{try_load_default_config, ExtensionClient};
///
/// if let Some(config) = try_load_default_config() {
///     let client = ExtensionClient::new(config).expect("Failed to build client");
///     println!("loaded configuration for {}", client.config().client_id);
/// } else {
///     eprintln!("No configuration found in standard locations");
/// }
/// ```
pub fn try_load_default_config() -> Option<ExtensionConfig> {
    if let Ok(config) = ExtensionConfig::from_env_or_file(DEFAULT_ENV_PREFIX) {
        debug!("loaded extension configuration from environment");
        return Some(config);
    }

    load_config_from_paths(&["./twitch-ext.json", "~/.twitch-ext/config.json"], |path| {
        ExtensionConfig::from_file(path)
    })
    .or_else(toml_default_config)
}

#[cfg(feature = "toml")]
fn toml_default_config() -> Option<ExtensionConfig> {
    load_config_from_paths(&["./twitch-ext.toml", "~/.twitch-ext/config.toml"], |path| {
        ExtensionConfig::from_toml(path)
    })
}

#[cfg(not(feature = "toml"))]
fn toml_default_config() -> Option<ExtensionConfig> {
    None
}

/// First candidate path that exists and loads
fn load_config_from_paths<F>(paths: &[&str], load: F) -> Option<ExtensionConfig>
where
    F: Fn(&Path) -> Result<ExtensionConfig, ConfigError>,
{
    for path in paths {
        let Some(expanded) = expand_home(path) else {
            continue;
        };
        if !expanded.exists() {
            continue;
        }
        match load(&expanded) {
            Ok(config) => {
                debug!(path = %expanded.display(), "loaded extension configuration");
                return Some(config);
            }
            Err(e) => {
                debug!(path = %expanded.display(), error = %e, "skipping unreadable configuration");
            }
        }
    }
    None
}

fn expand_home(path: &str) -> Option<PathBuf> {
    match path.strip_prefix("~/") {
        Some(stripped) => dirs::home_dir().map(|home| home.join(stripped)),
        None => Some(PathBuf::from(path)),
    }
}

/// Build a client from the first configuration [`try_load_default_config`] finds.
///
/// Each call loads afresh; the returned client owns its configuration.
pub fn default_client() -> Result<ExtensionClient, SdkError> {
    let config = try_load_default_config().ok_or_else(|| {
        SdkError::Generic("no extension configuration found in standard locations".into())
    })?;
    Ok(ExtensionClient::new(config)?)
}

/// Build a client from environment variables with the given prefix
pub fn client_from_env(prefix: &str) -> Result<ExtensionClient, SdkError> {
    let config = ExtensionConfig::from_env_or_file(prefix)?;
    Ok(ExtensionClient::new(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home() {
        assert_eq!(
            expand_home("./twitch-ext.json"),
            Some(PathBuf::from("./twitch-ext.json"))
        );
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                expand_home("~/.twitch-ext/config.json"),
                Some(home.join(".twitch-ext/config.json"))
            );
        }
    }

    #[test]
    fn test_load_config_from_paths_skips_missing_and_broken() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        let good = dir.path().join("good.json");
        let config = ExtensionConfig::new("owner", "client", "c2VjcmV0", "0.0.1", "1");
        std::fs::write(&good, serde_json::to_string(&config).unwrap()).unwrap();

        let missing = dir.path().join("missing.json");
        let paths = [
            missing.to_str().unwrap(),
            broken.to_str().unwrap(),
            good.to_str().unwrap(),
        ];
        let loaded = load_config_from_paths(&paths, |path| ExtensionConfig::from_file(path));
        assert_eq!(loaded.unwrap().owner_id, "owner");

        let none = load_config_from_paths(&paths[..2], |path| ExtensionConfig::from_file(path));
        assert!(none.is_none());
    }

    #[test]
    fn test_sdk_error_conversions() {
        let err: SdkError = ConfigError::MissingSecret.into();
        assert!(matches!(err, SdkError::Config(ConfigError::MissingSecret)));

        let err: SdkError = TokenError::MissingToken.into();
        assert!(err.to_string().contains("JWT token string missing"));

        let err: SdkError = ApiError::InvalidRequest("missing channelID".into()).into();
        assert!(matches!(err, SdkError::Api(ApiError::InvalidRequest(_))));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_load_toml_config_from_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "owner_id = \"owner\"\nclient_id = \"client\"\nsecret = \"c2VjcmV0\"\n",
        )
        .unwrap();

        let paths = [path.to_str().unwrap()];
        let loaded = load_config_from_paths(&paths, |path| ExtensionConfig::from_toml(path));
        assert_eq!(loaded.unwrap().client_id, "client");
    }

    #[cfg(not(feature = "toml"))]
    #[test]
    fn test_toml_lookup_disabled() {
        assert!(toml_default_config().is_none());
    }
}
