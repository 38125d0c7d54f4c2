use reqwest::Method;
use serde::Serialize;

use twitch_ext_token::{Permissions, Role};

use crate::client::{to_json_body, ExtensionClient};
use crate::response::ResponseCommon;
use crate::ApiError;

/// Longest extension chat message, in characters
pub const MAX_CHAT_MESSAGE_LENGTH: usize = 280;

#[derive(Serialize)]
struct ChatMessage<'a> {
    text: &'a str,
}

impl ExtensionClient {
    /// Send a chat message to a channel as the extension.
    ///
    /// The message is rejected locally, without a request, when the channel
    /// is empty or the text is longer than [`MAX_CHAT_MESSAGE_LENGTH`].
    pub async fn send_chat_message(
        &self,
        channel_id: &str,
        text: &str,
    ) -> Result<ResponseCommon, ApiError> {
        if channel_id.is_empty() {
            return Err(ApiError::InvalidRequest("missing channelID".into()));
        }
        let length = text.chars().count();
        if length > MAX_CHAT_MESSAGE_LENGTH {
            return Err(ApiError::InvalidRequest(format!(
                "chat message is {} characters, limit is {}",
                length, MAX_CHAT_MESSAGE_LENGTH
            )));
        }

        let config = self.config();
        let url = self.endpoint(&format!(
            "/extensions/{}/{}/channels/{}/chat",
            config.client_id, config.version, channel_id
        ));
        let claims = self.create_claims(
            channel_id,
            Some(Role::Broadcaster),
            Permissions::broadcast_send(),
        );
        let body = to_json_body(&ChatMessage { text })?;

        let (_, headers) = self
            .send(Method::POST, &url, Some(&claims), Some(body), &[])
            .await?;
        Ok(headers)
    }
}
