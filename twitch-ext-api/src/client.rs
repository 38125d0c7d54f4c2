use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderName, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use twitch_ext_config::ExtensionConfig;
use twitch_ext_token::{
    create_claims, sign_claims, verify_token, ExtensionClaims, Permissions, Role,
};

use crate::response::ResponseCommon;
use crate::ApiError;

const CLIENT_ID_HEADER: HeaderName = HeaderName::from_static("client-id");

/// Client for the extension API.
///
/// Cloning is cheap; clones share the configuration and the underlying
/// connection pool.
#[derive(Clone, Debug)]
pub struct ExtensionClient {
    config: Arc<ExtensionConfig>,
    http: reqwest::Client,
}

impl ExtensionClient {
    /// Create a client with a default `reqwest` transport
    pub fn new(config: ExtensionConfig) -> Result<Self, ApiError> {
        ExtensionClientBuilder::new().config(config).build()
    }

    /// Create a new client builder
    pub fn builder() -> ExtensionClientBuilder {
        ExtensionClientBuilder::new()
    }

    pub fn config(&self) -> &ExtensionConfig {
        &self.config
    }

    pub fn http_client(&self) -> &reqwest::Client {
        &self.http
    }

    /// Claims for a request made on behalf of the extension owner.
    ///
    /// An empty `channel_id` scopes the claims to all channels and a missing
    /// role defaults to external.
    pub fn create_claims(
        &self,
        channel_id: &str,
        role: Option<Role>,
        permissions: Permissions,
    ) -> ExtensionClaims {
        create_claims(&self.config.owner_id, channel_id, role, permissions)
    }

    /// Sign claims with the extension secret
    pub fn sign(&self, claims: &ExtensionClaims) -> Result<String, ApiError> {
        Ok(sign_claims(claims, &self.config.secret)?)
    }

    /// Verify a token issued for this extension, e.g. one sent by the frontend
    pub fn verify(&self, token: &str) -> Result<ExtensionClaims, ApiError> {
        Ok(verify_token(token, &self.config.secret)?)
    }

    /// Address of an API path under the configured base URL
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base(), path)
    }

    /// Perform a single API request.
    ///
    /// When `claims` are given they are signed and sent as a bearer token; a
    /// signing failure aborts before anything is sent. The client id and a JSON
    /// content type are always attached.
    ///
    /// # Returns
    ///
    /// * `200` - the full response body and headers
    /// * `204` - an empty body and headers
    ///
    /// # Errors
    ///
    /// * [`ApiError::Transport`] if no response was received
    /// * [`ApiError::RateLimitExceeded`] on `429`
    /// * [`ApiError::UnsupportedStatus`] on any other status
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        claims: Option<&ExtensionClaims>,
        body: Option<Vec<u8>>,
        query: &[(&str, &str)],
    ) -> Result<(Vec<u8>, ResponseCommon), ApiError> {
        let url = Url::parse(url)
            .map_err(|e| ApiError::InvalidRequest(format!("invalid url {:?}: {}", url, e)))?;

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header(CLIENT_ID_HEADER, self.config.client_id.as_str())
            .header(CONTENT_TYPE, "application/json");

        if let Some(claims) = claims {
            let token = self.sign(claims)?;
            request = request.bearer_auth(token);
        }
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        debug!(%method, %url, "sending extension API request");
        let response = request.send().await?;

        let status = response.status();
        let headers = ResponseCommon::new(response.headers().clone());
        debug!(%method, %url, status = status.as_u16(), "extension API responded");

        match status {
            StatusCode::OK => {
                let payload = response.bytes().await?;
                Ok((payload.to_vec(), headers))
            }
            StatusCode::NO_CONTENT => Ok((Vec::new(), headers)),
            StatusCode::TOO_MANY_REQUESTS => {
                warn!(%method, %url, "extension API rate limit exceeded");
                Err(ApiError::RateLimitExceeded {
                    headers: headers.to_json(),
                })
            }
            _ => Err(ApiError::UnsupportedStatus {
                code: status.as_u16(),
                status: status.to_string(),
            }),
        }
    }
}

/// Serialize a request body
pub(crate) fn to_json_body<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, ApiError> {
    Ok(serde_json::to_vec(value)?)
}

/// Decode a response payload
pub(crate) fn from_json_body<T: DeserializeOwned>(payload: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(payload)
        .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
}

/// Builder for creating extension API clients
#[derive(Default)]
pub struct ExtensionClientBuilder {
    config: Option<ExtensionConfig>,
    http_client: Option<reqwest::Client>,
    timeout: Option<Duration>,
}

impl ExtensionClientBuilder {
    /// Create a new client builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the extension configuration
    pub fn config(mut self, config: ExtensionConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a caller supplied transport instead of a default one
    pub fn http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Request timeout of the default transport; ignored with [`http_client`](Self::http_client)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ExtensionClient, ApiError> {
        let config = self
            .config
            .ok_or_else(|| ApiError::InvalidRequest("extension configuration is required".into()))?;
        config.validate()?;

        let http = match self.http_client {
            Some(http) => http,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(ExtensionClient {
            config: Arc::new(config),
            http,
        })
    }
}
