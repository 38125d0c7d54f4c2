//! # Twitch Extension API
//!
//! HTTP client for the Twitch extension API.
//!
//! Every operation funnels through [`ExtensionClient::send`], which signs the
//! request claims with the extension secret, attaches the client id, performs
//! a single round trip and classifies the response status. The endpoint
//! wrappers (configuration service, chat, pub/sub, secrets and live channel
//! listing) are thin call sites on top of it.
//!
//! ## Features
//!
//! - Short lived HS256 bearer tokens created per request
//! - Explicit status classification with rate limit reporting
//! - Rate limit counters exposed on every response through [`ResponseCommon`]
//! - Caller supplied `reqwest::Client` for custom transports

use thiserror::Error;

use twitch_ext_config::ConfigError;
use twitch_ext_token::TokenError;

mod channels;
mod chat;
mod client;
mod configuration;
mod pubsub;
mod response;
mod secrets;

pub use channels::{Channel, ExtensionEnabledChannels};
pub use chat::MAX_CHAT_MESSAGE_LENGTH;
pub use client::{ExtensionClient, ExtensionClientBuilder};
pub use configuration::{
    AllConfigurationsResponse, Configuration, ConfigurationResponse, Record, Segment, SegmentType,
};
pub use response::ResponseCommon;
pub use secrets::{Secret, SecretsResponse};

pub use reqwest::Method;

/// Error type for the API client
#[derive(Error, Debug)]
pub enum ApiError {
    /// Claims could not be signed (bad secret encoding or signing failure)
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// DNS, connection or timeout failure before a response was received
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered 429; carries the response headers as JSON
    #[error("rate limit exceeded, response headers: {headers}")]
    RateLimitExceeded { headers: String },

    /// Any status other than 200, 204 and 429
    #[error("unsupported response httpCode:{code} status:{status}")]
    UnsupportedStatus { code: u16, status: String },

    #[error("Invalid client configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration missing segment:{segment} channel_id:{channel_id}")]
    MissingConfiguration { segment: String, channel_id: String },

    #[error("Failed to serialize request body: {0}")]
    Json(#[from] serde_json::Error),
}
