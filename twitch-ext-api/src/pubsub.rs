use reqwest::Method;
use serde::Serialize;

use twitch_ext_token::{ExtensionClaims, Permissions, PublishTarget, Role, ALL_CHANNELS};

use crate::client::{to_json_body, ExtensionClient};
use crate::response::ResponseCommon;
use crate::ApiError;

#[derive(Serialize)]
struct Notification {
    message: String,
    targets: Vec<PublishTarget>,
    content_type: &'static str,
}

impl Notification {
    fn new<T: Serialize + ?Sized>(
        message: &T,
        target: PublishTarget,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            message: serde_json::to_string(message)?,
            targets: vec![target],
            content_type: "application/json",
        })
    }
}

impl ExtensionClient {
    /// Publish a message to every viewer of a channel
    pub async fn publish_channel_notification<T: Serialize + ?Sized>(
        &self,
        channel_id: &str,
        message: &T,
    ) -> Result<ResponseCommon, ApiError> {
        let claims = self.create_claims(
            channel_id,
            Some(Role::External),
            Permissions::broadcast_send(),
        );
        let notification = Notification::new(message, PublishTarget::Broadcast)?;
        self.publish(channel_id, &claims, &notification).await
    }

    /// Publish a message to a single viewer of a channel
    pub async fn publish_whisper_notification<T: Serialize + ?Sized>(
        &self,
        channel_id: &str,
        opaque_user_id: &str,
        message: &T,
    ) -> Result<ResponseCommon, ApiError> {
        let claims = self.create_claims(
            channel_id,
            Some(Role::External),
            Permissions::whisper_send(opaque_user_id),
        );
        let notification = Notification::new(message, PublishTarget::whisper(opaque_user_id))?;
        self.publish(channel_id, &claims, &notification).await
    }

    /// Publish a message to every channel the extension is active on
    pub async fn publish_global_notification<T: Serialize + ?Sized>(
        &self,
        message: &T,
    ) -> Result<ResponseCommon, ApiError> {
        let claims = self.create_claims("", Some(Role::External), Permissions::global_send());
        let notification = Notification::new(message, PublishTarget::Global)?;
        self.publish(ALL_CHANNELS, &claims, &notification).await
    }

    async fn publish(
        &self,
        channel_id: &str,
        claims: &ExtensionClaims,
        notification: &Notification,
    ) -> Result<ResponseCommon, ApiError> {
        let url = self.endpoint(&format!("/extensions/message/{}", channel_id));
        let (_, headers) = self
            .send(
                Method::POST,
                &url,
                Some(claims),
                Some(to_json_body(notification)?),
                &[],
            )
            .await?;
        Ok(headers)
    }
}
