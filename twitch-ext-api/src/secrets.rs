use reqwest::Method;
use serde::{Deserialize, Serialize};

use twitch_ext_token::{Permissions, Role};

use crate::client::{from_json_body, to_json_body, ExtensionClient};
use crate::response::ResponseCommon;
use crate::ApiError;

/// Secrets currently registered for the extension
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretsResponse {
    #[serde(rename = "format_version", default)]
    pub version: i64,
    #[serde(default)]
    pub secrets: Vec<Secret>,
    #[serde(skip)]
    pub headers: ResponseCommon,
}

/// A generated extension secret and its validity window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    #[serde(default)]
    pub active: String,
    pub content: String,
    #[serde(default)]
    pub expires: String,
}

#[derive(Serialize)]
struct SecretCreation {
    activation_delay_secs: u64,
}

impl ExtensionClient {
    /// Generate a new secret, used by the platform after `activation_delay_secs`
    pub async fn create_extension_secret(
        &self,
        activation_delay_secs: u64,
    ) -> Result<SecretsResponse, ApiError> {
        let body = to_json_body(&SecretCreation {
            activation_delay_secs,
        })?;
        let (payload, headers) = self.secrets_request(Method::POST, Some(body)).await?;

        let mut secrets: SecretsResponse = from_json_body(&payload)?;
        secrets.headers = headers;
        Ok(secrets)
    }

    pub async fn get_extension_secrets(&self) -> Result<SecretsResponse, ApiError> {
        let (payload, headers) = self.secrets_request(Method::GET, None).await?;

        let mut secrets: SecretsResponse = from_json_body(&payload)?;
        secrets.headers = headers;
        Ok(secrets)
    }

    /// Revoke every secret of the extension
    pub async fn revoke_extension_secrets(&self) -> Result<ResponseCommon, ApiError> {
        let (_, headers) = self.secrets_request(Method::DELETE, None).await?;
        Ok(headers)
    }

    async fn secrets_request(
        &self,
        method: Method,
        body: Option<Vec<u8>>,
    ) -> Result<(Vec<u8>, ResponseCommon), ApiError> {
        let url = self.endpoint(&format!(
            "/extensions/{}/auth/secret",
            self.config().client_id
        ));
        let claims = self.create_claims("", Some(Role::External), Permissions::global_send());
        self.send(method, &url, Some(&claims), body, &[]).await
    }
}
